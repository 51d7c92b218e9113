// HealthPulse Data
// This crate holds the health record store: storage models, tabular ingestion,
// synthetic series generation and in-memory session storage

// Storage models for health records and series
pub mod models;

// CSV ingestion of uploaded health data
pub mod ingest;

// Seeded synthetic series
pub mod synthetic;

// In-memory storage
pub mod repository;
