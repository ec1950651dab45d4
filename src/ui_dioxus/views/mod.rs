pub mod access_denied;
pub mod events_view;
pub mod login_view;
pub mod sacraments_view;
pub mod transactions_view;

pub use access_denied::AccessDenied;
pub use events_view::EventsView;
pub use login_view::LoginView;
pub use sacraments_view::SacramentsView;
pub use transactions_view::TransactionsView;
