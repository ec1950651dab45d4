use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::sacrament::SacramentRow;
use crate::domain::transaction::{number_rows, TransactionRow};
use crate::services::api_client::ParishApi;
use crate::services::toast::ToastQueue;

/// Fetch and delete for the ledger and sacrament register pages.
#[derive(Clone)]
pub struct RecordsService {
    api: Arc<dyn ParishApi>,
    toasts: ToastQueue,
}

impl RecordsService {
    pub fn new(api: Arc<dyn ParishApi>, toasts: ToastQueue) -> Self {
        Self { api, toasts }
    }

    /// `None` on failure, after an error toast.
    pub async fn transactions(&self) -> Option<Vec<TransactionRow>> {
        match self.api.list_transactions().await {
            Ok(transactions) => {
                info!(count = transactions.len(), "Transactions loaded");
                Some(number_rows(transactions))
            }
            Err(e) => {
                warn!(error = %e, "Transaction fetch failed");
                self.toasts
                    .error(e.user_message("Failed to fetch transactions"));
                None
            }
        }
    }

    pub async fn delete_transaction(&self, row: &TransactionRow) -> bool {
        match self.api.delete_transaction(row.transaction.id).await {
            Ok(()) => {
                info!(transaction_id = row.transaction.id, "Transaction deleted");
                self.toasts.success(format!(
                    "Transaction #{} has been deleted successfully.",
                    row.sno
                ));
                true
            }
            Err(e) => {
                warn!(transaction_id = row.transaction.id, error = %e, "Transaction delete failed");
                self.toasts
                    .error(e.user_message("Failed to delete transaction"));
                false
            }
        }
    }

    pub async fn sacraments(&self) -> Option<Vec<SacramentRow>> {
        match self.api.list_sacraments().await {
            Ok(records) => Some(records.iter().map(SacramentRow::from).collect()),
            Err(e) => {
                warn!(error = %e, "Sacrament fetch failed");
                self.toasts
                    .error(e.user_message("Failed to fetch sacrament records."));
                None
            }
        }
    }

    pub async fn delete_sacrament(&self, id: i64) -> bool {
        match self.api.delete_sacrament(id).await {
            Ok(()) => {
                info!(sacrament_id = id, "Sacrament record deleted");
                self.toasts.success("Sacrament record deleted.");
                true
            }
            Err(e) => {
                warn!(sacrament_id = id, error = %e, "Sacrament delete failed");
                self.toasts
                    .error(e.user_message("Failed to delete sacrament record."));
                false
            }
        }
    }
}
