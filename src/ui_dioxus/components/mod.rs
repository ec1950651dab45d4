pub mod confirmation_dialog;
pub mod confirmation_modal;
pub mod data_table;
pub mod event_card;
pub mod event_filters;
pub mod registered_roster_modal;
pub mod registration_modal;
pub mod scoped_dialog;
pub mod toaster;

pub use confirmation_dialog::ConfirmationDialog;
pub use confirmation_modal::ConfirmationModal;
pub use data_table::DataTable;
pub use event_card::EventCard;
pub use event_filters::EventFilters;
pub use registered_roster_modal::RegisteredRosterModal;
pub use registration_modal::RegistrationModal;
pub use scoped_dialog::ScopedDialog;
pub use toaster::Toaster;
