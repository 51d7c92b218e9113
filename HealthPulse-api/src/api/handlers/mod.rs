pub mod analytics;
pub mod assistant;
pub mod health;
pub mod health_data;
pub mod sessions;

// Tests module
#[cfg(test)]
mod tests;

// Re-export handlers for easier imports
pub use analytics::{generate_health_insights, get_analytics, get_metric_summary};
pub use assistant::{create_treatment_plan, predict_disease};
pub use health::health_check;
pub use health_data::{upload_document, upload_health_data};
pub use sessions::{
    ask_question, create_session, delete_session, get_conversation, get_session, reset_session, update_profile,
};
