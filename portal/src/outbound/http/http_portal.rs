//! Reqwest-backed adapter for the complaint backend.
//!
//! This adapter owns transport details only: URL joining, bearer headers,
//! timeout and HTTP status mapping, and JSON decoding into domain values.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::dto::{
    ComplaintDto, CreateComplaintDto, LoginRequestDto, LoginResponseDto, RegisterRequestDto,
    UpdateStatusDto, UserDto, extract_detail,
};
use crate::domain::ports::PortalApi;
use crate::domain::{
    AccessToken, Complaint, ComplaintId, ComplaintStatus, Error, ErrorCode, LoginCredentials,
    NewComplaint, Registration, Session, User,
};

/// Remote operations, used for fallback messages and log fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    Login,
    Register,
    FetchProfile,
    ListComplaints,
    CreateComplaint,
    UpdateStatus,
    FetchComplaint,
    DeleteComplaint,
    ListUsers,
}

impl Operation {
    fn name(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Register => "register",
            Self::FetchProfile => "fetch_profile",
            Self::ListComplaints => "list_complaints",
            Self::CreateComplaint => "create_complaint",
            Self::UpdateStatus => "update_status",
            Self::FetchComplaint => "fetch_complaint",
            Self::DeleteComplaint => "delete_complaint",
            Self::ListUsers => "list_users",
        }
    }

    fn fallback_message(self, status: StatusCode) -> String {
        match self {
            Self::Login => "Login failed".to_owned(),
            Self::Register => "Registration failed".to_owned(),
            Self::FetchProfile => "Failed to get profile".to_owned(),
            Self::ListComplaints => format!("Failed to get complaints: {}", status.as_u16()),
            Self::CreateComplaint => "Failed to submit complaint".to_owned(),
            Self::UpdateStatus => "Failed to update complaint status".to_owned(),
            Self::FetchComplaint => "Failed to get complaint".to_owned(),
            Self::DeleteComplaint => "Failed to delete complaint".to_owned(),
            Self::ListUsers => "Failed to list users".to_owned(),
        }
    }
}

/// Complaint backend adapter talking JSON over HTTP.
pub struct HttpPortalApi {
    client: Client,
    base: Url,
}

impl HttpPortalApi {
    /// Build an adapter rooted at `base` (for example
    /// `http://localhost:8000/api`) with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base: normalise_base(base),
        })
    }

    /// Base URL every endpoint is joined onto.
    pub fn base(&self) -> &Url {
        &self.base
    }

    fn request(
        &self,
        method: Method,
        path: &str,
        token: Option<&AccessToken>,
    ) -> Result<RequestBuilder, Error> {
        let url = self
            .base
            .join(path)
            .map_err(|err| Error::internal(format!("invalid endpoint '{path}': {err}")))?;
        let builder = self
            .client
            .request(method, url)
            .header(reqwest::header::ACCEPT, "application/json");
        Ok(match token {
            Some(token) => builder.bearer_auth(token.expose()),
            None => builder,
        })
    }

    async fn send(&self, op: Operation, builder: RequestBuilder) -> Result<Vec<u8>, Error> {
        let response: Response = builder.send().await.map_err(map_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        debug!(operation = op.name(), status = status.as_u16(), "backend responded");
        if !status.is_success() {
            return Err(map_status_error(op, status, body.as_ref()));
        }
        Ok(body.to_vec())
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        op: Operation,
        builder: RequestBuilder,
    ) -> Result<T, Error> {
        let body = self.send(op, builder).await?;
        decode(op, &body)
    }
}

fn normalise_base(mut base: Url) -> Url {
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base
}

fn decode<T: DeserializeOwned>(op: Operation, body: &[u8]) -> Result<T, Error> {
    serde_json::from_slice(body)
        .map_err(|err| Error::fetch(format!("invalid {} response: {err}", op.name())))
}

fn map_transport_error(error: reqwest::Error) -> Error {
    if error.is_timeout() {
        Error::fetch(format!("request timed out: {error}"))
    } else {
        Error::fetch(error.to_string())
    }
}

fn map_status_error(op: Operation, status: StatusCode, body: &[u8]) -> Error {
    let message = extract_detail(body).unwrap_or_else(|| op.fallback_message(status));
    let code = match status {
        StatusCode::UNAUTHORIZED => ErrorCode::Unauthorized,
        StatusCode::FORBIDDEN => ErrorCode::Forbidden,
        StatusCode::NOT_FOUND => ErrorCode::NotFound,
        StatusCode::BAD_REQUEST | StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => {
            ErrorCode::InvalidRequest
        }
        _ => ErrorCode::Fetch,
    };
    Error::new(code, message)
}

fn complaint_path(id: ComplaintId) -> String {
    format!("complaints/{id}")
}

#[async_trait]
impl PortalApi for HttpPortalApi {
    async fn login(&self, credentials: &LoginCredentials) -> Result<Session, Error> {
        let builder = self
            .request(Method::POST, "users/login", None)
            .map_err(|err| err.with_code(ErrorCode::Unauthorized))?
            .json(&LoginRequestDto {
                email: credentials.email(),
                password: credentials.password(),
            });
        let dto: LoginResponseDto = self
            .send_json(Operation::Login, builder)
            .await
            .map_err(|err| err.with_code(ErrorCode::Unauthorized))?;
        dto.into_session().map_err(Error::unauthorized)
    }

    async fn register(&self, registration: &Registration) -> Result<User, Error> {
        let builder = self
            .request(Method::POST, "users/register", None)?
            .json(&RegisterRequestDto::from(registration));
        let dto: UserDto = self.send_json(Operation::Register, builder).await?;
        dto.into_domain().map_err(Error::fetch)
    }

    async fn fetch_profile(&self, token: &AccessToken) -> Result<User, Error> {
        let builder = self.request(Method::GET, "users/me", Some(token))?;
        let dto: UserDto = self.send_json(Operation::FetchProfile, builder).await?;
        dto.into_domain().map_err(Error::fetch)
    }

    async fn list_complaints(&self, token: &AccessToken) -> Result<Vec<Complaint>, Error> {
        let builder = self.request(Method::GET, "complaints", Some(token))?;
        let dtos: Vec<ComplaintDto> = self.send_json(Operation::ListComplaints, builder).await?;
        dtos.into_iter()
            .map(ComplaintDto::into_domain)
            .collect::<Result<Vec<_>, _>>()
            .map_err(Error::fetch)
    }

    async fn create_complaint(
        &self,
        token: &AccessToken,
        complaint: &NewComplaint,
    ) -> Result<Complaint, Error> {
        let builder = self
            .request(Method::POST, "complaints", Some(token))?
            .json(&CreateComplaintDto::from(complaint));
        let dto: ComplaintDto = self.send_json(Operation::CreateComplaint, builder).await?;
        dto.into_domain().map_err(Error::fetch)
    }

    async fn update_status(
        &self,
        token: &AccessToken,
        id: ComplaintId,
        status: ComplaintStatus,
    ) -> Result<Complaint, Error> {
        let builder = self
            .request(Method::PUT, &complaint_path(id), Some(token))?
            .json(&UpdateStatusDto { status });
        let dto: ComplaintDto = self.send_json(Operation::UpdateStatus, builder).await?;
        dto.into_domain().map_err(Error::fetch)
    }

    async fn fetch_complaint(
        &self,
        token: &AccessToken,
        id: ComplaintId,
    ) -> Result<Complaint, Error> {
        let builder = self.request(Method::GET, &complaint_path(id), Some(token))?;
        let dto: ComplaintDto = self.send_json(Operation::FetchComplaint, builder).await?;
        dto.into_domain().map_err(Error::fetch)
    }

    async fn delete_complaint(&self, token: &AccessToken, id: ComplaintId) -> Result<(), Error> {
        let builder = self.request(Method::DELETE, &complaint_path(id), Some(token))?;
        self.send(Operation::DeleteComplaint, builder).await?;
        Ok(())
    }

    async fn list_users(&self, token: &AccessToken) -> Result<Vec<User>, Error> {
        let builder = self.request(Method::GET, "users/all", Some(token))?;
        let dtos: Vec<UserDto> = self.send_json(Operation::ListUsers, builder).await?;
        dtos.into_iter()
            .map(UserDto::into_domain)
            .collect::<Result<Vec<_>, _>>()
            .map_err(Error::fetch)
    }
}
