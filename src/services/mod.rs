pub mod api_client;
pub mod auth_service;
pub mod event_catalog;
pub mod receipt;
pub mod records_service;
pub mod registration_service;
pub mod toast;
pub mod transaction_report;

pub use api_client::{HttpApiClient, ParishApi};
pub use auth_service::AuthService;
pub use event_catalog::EventCatalog;
pub use receipt::ReceiptGenerator;
pub use records_service::RecordsService;
pub use registration_service::RegistrationService;
pub use toast::ToastQueue;
