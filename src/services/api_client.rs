use async_trait::async_trait;
use regex::Regex;
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::{debug, warn};

use crate::config::ConsoleConfig;
use crate::domain::event::Event;
use crate::domain::family::{Family, Parishioner, RegisteredParishioner};
use crate::domain::opt_string_or_number;
use crate::domain::receipt::Receipt;
use crate::domain::registration::RegistrationRequest;
use crate::domain::sacrament::Sacrament;
use crate::domain::session::{SessionHandle, User};
use crate::domain::transaction::Transaction;
use crate::error::ApiError;

static EXPIRED_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(token|session|jwt).*(expired|invalid)").expect("static pattern compiles")
});

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationResponse {
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub receipt_number: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoginResponse {
    pub user: User,
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Deserialize)]
struct EventsBody {
    #[serde(default)]
    events: Vec<Event>,
}

#[derive(Deserialize)]
struct FamiliesBody {
    #[serde(default)]
    families: Vec<Family>,
}

#[derive(Deserialize)]
struct ParishionersBody<T> {
    #[serde(default = "Vec::new")]
    parishioners: Vec<T>,
}

#[derive(Deserialize)]
struct TransactionsBody {
    #[serde(default)]
    transactions: Vec<Transaction>,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Serialize)]
struct IdBody {
    id: i64,
}

/// Everything the console asks of the parish REST service.
#[async_trait]
pub trait ParishApi: Send + Sync {
    async fn list_events(&self) -> Result<Vec<Event>, ApiError>;

    async fn unregistered_families(&self, event_id: i64) -> Result<Vec<Family>, ApiError>;

    async fn unregistered_individuals(&self, event_id: i64) -> Result<Vec<Parishioner>, ApiError>;

    async fn register(
        &self,
        request: &RegistrationRequest,
    ) -> Result<RegistrationResponse, ApiError>;

    async fn fetch_receipt(&self, receipt_number: &str) -> Result<Receipt, ApiError>;

    async fn registered_parishioners(
        &self,
        event_id: i64,
    ) -> Result<Vec<RegisteredParishioner>, ApiError>;

    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError>;

    async fn logout(&self) -> Result<(), ApiError>;

    async fn list_transactions(&self) -> Result<Vec<Transaction>, ApiError>;

    async fn delete_transaction(&self, id: i64) -> Result<(), ApiError>;

    async fn list_sacraments(&self) -> Result<Vec<Sacrament>, ApiError>;

    async fn delete_sacrament(&self, id: i64) -> Result<(), ApiError>;
}

/// Maps a status and body to success or a typed error.
/// With `detect_expiry`, 401 and "token expired" 403s become [`ApiError::SessionExpired`].
pub fn check_status(status: u16, body: &str, detect_expiry: bool) -> Result<(), ApiError> {
    if (200..300).contains(&status) {
        return Ok(());
    }

    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty());

    if detect_expiry {
        let expired = status == 401
            || (status == 403 && message.as_deref().is_some_and(|m| EXPIRED_TOKEN.is_match(m)));
        if expired {
            return Err(ApiError::SessionExpired);
        }
    }

    Err(ApiError::Status { status, message })
}

pub fn decode_response<T: DeserializeOwned>(
    status: u16,
    body: &str,
    detect_expiry: bool,
) -> Result<T, ApiError> {
    check_status(status, body, detect_expiry)?;
    Ok(serde_json::from_str(body)?)
}

/// reqwest-backed client bound to the configured base URL.
#[derive(Clone)]
pub struct HttpApiClient {
    client: Client,
    base: Url,
    session: SessionHandle,
}

impl HttpApiClient {
    pub fn new(config: &ConsoleConfig, session: SessionHandle) -> Result<Self, ApiError> {
        let base = Url::parse(&config.api_base_url).map_err(|e| ApiError::Config {
            message: format!("invalid base URL {}: {}", config.api_base_url, e),
        })?;

        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(config.request_timeout);
        let client = builder.build().map_err(|e| ApiError::Config {
            message: e.to_string(),
        })?;

        Ok(Self {
            client,
            base,
            session,
        })
    }

    fn url(&self, path: &str) -> Result<Url, ApiError> {
        self.base.join(path).map_err(|e| ApiError::Config {
            message: format!("invalid path {}: {}", path, e),
        })
    }

    /// Sends with the session's bearer token and returns status plus body.
    async fn send(&self, request: RequestBuilder) -> Result<(u16, String), ApiError> {
        let request = match self.session.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok((status, body))
    }

    fn observe<T>(&self, path: &str, result: Result<T, ApiError>) -> Result<T, ApiError> {
        match &result {
            Err(ApiError::SessionExpired) => {
                self.session.expire();
                warn!(path, "Request rejected with an expired session");
            }
            Err(e) => warn!(path, error = %e, "Request failed"),
            Ok(_) => debug!(path, "Request completed"),
        }
        result
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let result = async {
            let (status, body) = self.send(self.client.get(self.url(path)?)).await?;
            decode_response(status, &body, true)
        }
        .await;
        self.observe(path, result)
    }

    async fn post_json<B, T>(&self, path: &str, payload: &B) -> Result<T, ApiError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let result = async {
            let request = self.client.post(self.url(path)?).json(payload);
            let (status, body) = self.send(request).await?;
            decode_response(status, &body, true)
        }
        .await;
        self.observe(path, result)
    }

    async fn execute(&self, path: &str, request: RequestBuilder) -> Result<(), ApiError> {
        let result = async {
            let (status, body) = self.send(request).await?;
            check_status(status, &body, true)
        }
        .await;
        self.observe(path, result)
    }
}

#[async_trait]
impl ParishApi for HttpApiClient {
    async fn list_events(&self) -> Result<Vec<Event>, ApiError> {
        let body: EventsBody = self.get_json("api/events/all").await?;
        Ok(body.events)
    }

    async fn unregistered_families(&self, event_id: i64) -> Result<Vec<Family>, ApiError> {
        let path = format!("api/events/unregistered/families/{}", event_id);
        let body: FamiliesBody = self.get_json(&path).await?;
        Ok(body.families)
    }

    async fn unregistered_individuals(&self, event_id: i64) -> Result<Vec<Parishioner>, ApiError> {
        let path = format!("api/events/unregistered/individuals/{}", event_id);
        let body: ParishionersBody<Parishioner> = self.get_json(&path).await?;
        Ok(body.parishioners)
    }

    async fn register(
        &self,
        request: &RegistrationRequest,
    ) -> Result<RegistrationResponse, ApiError> {
        self.post_json(request.endpoint(), request).await
    }

    async fn fetch_receipt(&self, receipt_number: &str) -> Result<Receipt, ApiError> {
        let path = format!("api/events/receipt/{}", receipt_number);
        self.get_json(&path).await
    }

    async fn registered_parishioners(
        &self,
        event_id: i64,
    ) -> Result<Vec<RegisteredParishioner>, ApiError> {
        let path = format!("api/events/registered/event/{}", event_id);
        let body: ParishionersBody<RegisteredParishioner> = self.get_json(&path).await?;
        Ok(body.parishioners)
    }

    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        // A 401 here means bad credentials, not an expired session.
        let path = "api/auth/login";
        let request = self.client.post(self.url(path)?).json(credentials);
        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        decode_response(status, &body, false)
    }

    async fn logout(&self) -> Result<(), ApiError> {
        let path = "api/auth/logout";
        let request = self.client.post(self.url(path)?);
        let (status, body) = self.send(request).await?;
        check_status(status, &body, false)
    }

    async fn list_transactions(&self) -> Result<Vec<Transaction>, ApiError> {
        let body: TransactionsBody = self.get_json("api/transactions/all").await?;
        Ok(body.transactions)
    }

    async fn delete_transaction(&self, id: i64) -> Result<(), ApiError> {
        let path = "api/transactions/delete";
        let request = self.client.delete(self.url(path)?).json(&IdBody { id });
        self.execute(path, request).await
    }

    async fn list_sacraments(&self) -> Result<Vec<Sacrament>, ApiError> {
        self.get_json("api/sacraments/").await
    }

    async fn delete_sacrament(&self, id: i64) -> Result<(), ApiError> {
        let path = format!("api/sacraments/{}", id);
        let request = self.client.delete(self.url(&path)?);
        self.execute(&path, request).await
    }
}

pub mod mock {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone, PartialEq)]
    pub enum MockCall {
        ListEvents,
        UnregisteredFamilies(i64),
        UnregisteredIndividuals(i64),
        Register(RegistrationRequest),
        FetchReceipt(String),
        RegisteredParishioners(i64),
        Login(String),
        Logout,
        ListTransactions,
        DeleteTransaction(i64),
        ListSacraments,
        DeleteSacrament(i64),
    }

    struct MockResponses {
        events: Result<Vec<Event>, ApiError>,
        families: Result<Vec<Family>, ApiError>,
        individuals: Result<Vec<Parishioner>, ApiError>,
        register: Result<RegistrationResponse, ApiError>,
        receipt: Result<Receipt, ApiError>,
        registered: Result<Vec<RegisteredParishioner>, ApiError>,
        login: Result<LoginResponse, ApiError>,
        logout: Result<(), ApiError>,
        transactions: Result<Vec<Transaction>, ApiError>,
        sacraments: Result<Vec<Sacrament>, ApiError>,
        delete: Result<(), ApiError>,
    }

    impl Default for MockResponses {
        fn default() -> Self {
            Self {
                events: Ok(Vec::new()),
                families: Ok(Vec::new()),
                individuals: Ok(Vec::new()),
                register: Ok(RegistrationResponse::default()),
                receipt: Err(ApiError::Status {
                    status: 404,
                    message: Some("Receipt not found".to_string()),
                }),
                registered: Ok(Vec::new()),
                login: Err(ApiError::Status {
                    status: 401,
                    message: Some("Invalid credentials".to_string()),
                }),
                logout: Ok(()),
                transactions: Ok(Vec::new()),
                sacraments: Ok(Vec::new()),
                delete: Ok(()),
            }
        }
    }

    /// Canned-response API with a recorded call history.
    #[derive(Clone, Default)]
    pub struct MockParishApi {
        responses: Arc<Mutex<MockResponses>>,
        call_history: Arc<Mutex<Vec<MockCall>>>,
    }

    impl MockParishApi {
        pub fn new() -> Self {
            Self::default()
        }

        fn record(&self, call: MockCall) {
            self.call_history.lock().unwrap().push(call);
        }

        pub fn set_events(&self, events: Result<Vec<Event>, ApiError>) {
            self.responses.lock().unwrap().events = events;
        }

        pub fn set_families(&self, families: Result<Vec<Family>, ApiError>) {
            self.responses.lock().unwrap().families = families;
        }

        pub fn set_individuals(&self, individuals: Result<Vec<Parishioner>, ApiError>) {
            self.responses.lock().unwrap().individuals = individuals;
        }

        pub fn set_register_response(&self, response: Result<RegistrationResponse, ApiError>) {
            self.responses.lock().unwrap().register = response;
        }

        pub fn set_receipt(&self, receipt: Result<Receipt, ApiError>) {
            self.responses.lock().unwrap().receipt = receipt;
        }

        pub fn set_registered(&self, registered: Result<Vec<RegisteredParishioner>, ApiError>) {
            self.responses.lock().unwrap().registered = registered;
        }

        pub fn set_login(&self, login: Result<LoginResponse, ApiError>) {
            self.responses.lock().unwrap().login = login;
        }

        pub fn set_logout(&self, logout: Result<(), ApiError>) {
            self.responses.lock().unwrap().logout = logout;
        }

        pub fn set_transactions(&self, transactions: Result<Vec<Transaction>, ApiError>) {
            self.responses.lock().unwrap().transactions = transactions;
        }

        pub fn set_sacraments(&self, sacraments: Result<Vec<Sacrament>, ApiError>) {
            self.responses.lock().unwrap().sacraments = sacraments;
        }

        pub fn set_delete_result(&self, result: Result<(), ApiError>) {
            self.responses.lock().unwrap().delete = result;
        }

        pub fn calls(&self) -> Vec<MockCall> {
            self.call_history.lock().unwrap().clone()
        }

        pub fn count_calls(&self, predicate: impl Fn(&MockCall) -> bool) -> usize {
            self.call_history
                .lock()
                .unwrap()
                .iter()
                .filter(|c| predicate(c))
                .count()
        }

        pub fn registrations(&self) -> Vec<RegistrationRequest> {
            self.calls()
                .into_iter()
                .filter_map(|c| match c {
                    MockCall::Register(request) => Some(request),
                    _ => None,
                })
                .collect()
        }
    }

    #[async_trait]
    impl ParishApi for MockParishApi {
        async fn list_events(&self) -> Result<Vec<Event>, ApiError> {
            self.record(MockCall::ListEvents);
            self.responses.lock().unwrap().events.clone()
        }

        async fn unregistered_families(&self, event_id: i64) -> Result<Vec<Family>, ApiError> {
            self.record(MockCall::UnregisteredFamilies(event_id));
            self.responses.lock().unwrap().families.clone()
        }

        async fn unregistered_individuals(
            &self,
            event_id: i64,
        ) -> Result<Vec<Parishioner>, ApiError> {
            self.record(MockCall::UnregisteredIndividuals(event_id));
            self.responses.lock().unwrap().individuals.clone()
        }

        async fn register(
            &self,
            request: &RegistrationRequest,
        ) -> Result<RegistrationResponse, ApiError> {
            self.record(MockCall::Register(request.clone()));
            self.responses.lock().unwrap().register.clone()
        }

        async fn fetch_receipt(&self, receipt_number: &str) -> Result<Receipt, ApiError> {
            self.record(MockCall::FetchReceipt(receipt_number.to_string()));
            self.responses.lock().unwrap().receipt.clone()
        }

        async fn registered_parishioners(
            &self,
            event_id: i64,
        ) -> Result<Vec<RegisteredParishioner>, ApiError> {
            self.record(MockCall::RegisteredParishioners(event_id));
            self.responses.lock().unwrap().registered.clone()
        }

        async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
            self.record(MockCall::Login(credentials.email.clone()));
            self.responses.lock().unwrap().login.clone()
        }

        async fn logout(&self) -> Result<(), ApiError> {
            self.record(MockCall::Logout);
            self.responses.lock().unwrap().logout.clone()
        }

        async fn list_transactions(&self) -> Result<Vec<Transaction>, ApiError> {
            self.record(MockCall::ListTransactions);
            self.responses.lock().unwrap().transactions.clone()
        }

        async fn delete_transaction(&self, id: i64) -> Result<(), ApiError> {
            self.record(MockCall::DeleteTransaction(id));
            self.responses.lock().unwrap().delete.clone()
        }

        async fn list_sacraments(&self) -> Result<Vec<Sacrament>, ApiError> {
            self.record(MockCall::ListSacraments);
            self.responses.lock().unwrap().sacraments.clone()
        }

        async fn delete_sacrament(&self, id: i64) -> Result<(), ApiError> {
            self.record(MockCall::DeleteSacrament(id));
            self.responses.lock().unwrap().delete.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_decodes_body() {
        let body = r#"{"events": [{"id": 1, "title": "Mass"}]}"#;
        let decoded: EventsBody = decode_response(200, body, true).unwrap();
        assert_eq!(decoded.events.len(), 1);
    }

    #[test]
    fn test_missing_list_decodes_empty() {
        let decoded: FamiliesBody = decode_response(200, "{}", true).unwrap();
        assert!(decoded.families.is_empty());
    }

    #[test]
    fn test_malformed_body_is_decode_error() {
        let result: Result<EventsBody, ApiError> = decode_response(200, "<html>", true);
        assert!(matches!(result, Err(ApiError::Decode { .. })));
    }

    #[test]
    fn test_unauthorized_is_session_expiry() {
        assert_eq!(check_status(401, "", true), Err(ApiError::SessionExpired));
        assert_eq!(
            check_status(401, r#"{"message": "Invalid credentials"}"#, false),
            Err(ApiError::Status {
                status: 401,
                message: Some("Invalid credentials".into())
            })
        );
    }

    #[test]
    fn test_forbidden_expiry_needs_token_message() {
        assert_eq!(
            check_status(403, r#"{"message": "Token expired"}"#, true),
            Err(ApiError::SessionExpired)
        );
        assert_eq!(
            check_status(403, r#"{"message": "Admins only"}"#, true),
            Err(ApiError::Status {
                status: 403,
                message: Some("Admins only".into())
            })
        );
    }

    #[test]
    fn test_error_message_is_extracted() {
        let err = check_status(409, r#"{"message": "Already registered"}"#, true).unwrap_err();
        assert_eq!(err.server_message(), Some("Already registered"));

        let err = check_status(500, "Internal Server Error", true).unwrap_err();
        assert_eq!(err.server_message(), None);
    }

    #[test]
    fn test_registration_response_accepts_numeric_receipt() {
        let resp: RegistrationResponse =
            decode_response(201, r#"{"receiptNumber": 77}"#, true).unwrap();
        assert_eq!(resp.receipt_number.as_deref(), Some("77"));
    }

    #[test]
    fn test_client_rejects_bad_base_url() {
        let config = ConsoleConfig {
            api_base_url: "::nope".into(),
            ..Default::default()
        };
        assert!(matches!(
            HttpApiClient::new(&config, SessionHandle::new()),
            Err(ApiError::Config { .. })
        ));
    }

    #[tokio::test]
    async fn test_mock_records_calls() {
        let api = mock::MockParishApi::new();
        api.set_events(Ok(vec![Event::new(1, "Mass")]));
        assert_eq!(api.list_events().await.unwrap().len(), 1);
        let _ = api.unregistered_families(1).await;
        assert_eq!(
            api.calls(),
            vec![mock::MockCall::ListEvents, mock::MockCall::UnregisteredFamilies(1)]
        );
    }
}
