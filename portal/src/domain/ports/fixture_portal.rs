//! In-memory stand-in for the complaint backend.
//!
//! Mirrors the backend's scoping and authorisation rules closely enough for
//! controller tests and behaviour scenarios: students see their own
//! complaints, only administrators change status, and unknown tokens are
//! rejected as unauthorised.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::{
    AccessToken, Complaint, ComplaintId, ComplaintStatus, Error, ErrorCode, LoginCredentials,
    NewComplaint, Registration, Role, Session, User, UserId,
};

use super::PortalApi;

/// Operation names used for call recording and failure injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FixtureOperation {
    /// [`PortalApi::login`].
    Login,
    /// [`PortalApi::register`].
    Register,
    /// [`PortalApi::fetch_profile`].
    FetchProfile,
    /// [`PortalApi::list_complaints`].
    ListComplaints,
    /// [`PortalApi::create_complaint`].
    CreateComplaint,
    /// [`PortalApi::update_status`].
    UpdateStatus,
    /// [`PortalApi::fetch_complaint`].
    FetchComplaint,
    /// [`PortalApi::delete_complaint`].
    DeleteComplaint,
    /// [`PortalApi::list_users`].
    ListUsers,
}

#[derive(Debug, Clone)]
struct Account {
    user: User,
    password: String,
}

#[derive(Debug, Default)]
struct Backend {
    accounts: Vec<Account>,
    tokens: HashMap<String, UserId>,
    complaints: Vec<Complaint>,
    next_user: i64,
    next_complaint: i64,
    failures: HashMap<FixtureOperation, Error>,
    calls: Vec<FixtureOperation>,
}

impl Backend {
    fn begin(&mut self, op: FixtureOperation) -> Result<(), Error> {
        self.calls.push(op);
        match self.failures.remove(&op) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn caller(&self, token: &AccessToken) -> Result<User, Error> {
        self.tokens
            .get(token.expose())
            .and_then(|id| self.accounts.iter().find(|a| a.user.id() == *id))
            .map(|account| account.user.clone())
            .ok_or_else(|| Error::unauthorized("Invalid credentials"))
    }

    fn position(&self, id: ComplaintId) -> Result<usize, Error> {
        self.complaints
            .iter()
            .position(|c| c.id() == id)
            .ok_or_else(|| Error::not_found("Complaint not found"))
    }

    fn insert_user(&mut self, user: User, password: &str) -> UserId {
        self.next_user = self.next_user.max(user.id().get()) + 1;
        let id = user.id();
        self.accounts.push(Account {
            user,
            password: password.to_owned(),
        });
        id
    }

    fn allocate_user_id(&self) -> UserId {
        UserId::new(self.next_user.max(1))
    }

    fn allocate_complaint_id(&mut self) -> ComplaintId {
        self.next_complaint += 1;
        ComplaintId::new(self.next_complaint)
    }
}

/// Fixture backend shared behind a mutex so it can be driven through `&self`.
#[derive(Debug, Default)]
pub struct FixturePortalApi {
    backend: Mutex<Backend>,
}

impl FixturePortalApi {
    fn backend(&self) -> MutexGuard<'_, Backend> {
        self.backend.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register an account directly, bypassing validation.
    pub fn seed_user(&self, user: User, password: &str) -> UserId {
        self.backend().insert_user(user, password)
    }

    /// Issue `token` for an existing user without going through login.
    pub fn seed_token(&self, token: &str, user: UserId) {
        self.backend().tokens.insert(token.to_owned(), user);
    }

    /// Store a complaint as-is. Later generated ids continue after it.
    pub fn seed_complaint(&self, complaint: Complaint) {
        let mut backend = self.backend();
        backend.next_complaint = backend.next_complaint.max(complaint.id().get());
        backend.complaints.push(complaint);
    }

    /// Make the next call to `op` fail with `error`.
    pub fn fail_next(&self, op: FixtureOperation, error: Error) {
        self.backend().failures.insert(op, error);
    }

    /// Revoke every issued token, as if they had expired.
    pub fn revoke_tokens(&self) {
        self.backend().tokens.clear();
    }

    /// Operations invoked so far, in order.
    pub fn calls(&self) -> Vec<FixtureOperation> {
        self.backend().calls.clone()
    }

    /// Server-side copy of every complaint.
    pub fn stored_complaints(&self) -> Vec<Complaint> {
        self.backend().complaints.clone()
    }
}

#[async_trait]
impl PortalApi for FixturePortalApi {
    async fn login(&self, credentials: &LoginCredentials) -> Result<Session, Error> {
        let mut backend = self.backend();
        backend
            .begin(FixtureOperation::Login)
            .map_err(|err| err.with_code(ErrorCode::Unauthorized))?;
        let (id, role) = backend
            .accounts
            .iter()
            .find(|a| a.user.email() == credentials.email() && a.password == credentials.password())
            .map(|a| (a.user.id(), a.user.role()))
            .ok_or_else(|| Error::unauthorized("Invalid credentials"))?;
        let token = format!("fixture-token-{}-{}", id, backend.tokens.len() + 1);
        backend.tokens.insert(token.clone(), id);
        Ok(Session::new(AccessToken::new(token), role))
    }

    async fn register(&self, registration: &Registration) -> Result<User, Error> {
        let mut backend = self.backend();
        backend.begin(FixtureOperation::Register)?;
        if backend
            .accounts
            .iter()
            .any(|a| a.user.email() == registration.email())
        {
            return Err(Error::invalid_request("Email already registered"));
        }
        if backend
            .accounts
            .iter()
            .any(|a| a.user.roll_number() == registration.roll_number())
        {
            return Err(Error::invalid_request("Roll number already registered"));
        }
        let user = User::builder(backend.allocate_user_id(), registration.email())
            .name(registration.name())
            .roll_number(registration.roll_number())
            .hostel(registration.hostel())
            .room_number(registration.room_number().map(str::to_owned))
            .role(Role::Student)
            .build();
        backend.insert_user(user.clone(), registration.password());
        Ok(user)
    }

    async fn fetch_profile(&self, token: &AccessToken) -> Result<User, Error> {
        let mut backend = self.backend();
        backend.begin(FixtureOperation::FetchProfile)?;
        backend.caller(token)
    }

    async fn list_complaints(&self, token: &AccessToken) -> Result<Vec<Complaint>, Error> {
        let mut backend = self.backend();
        backend.begin(FixtureOperation::ListComplaints)?;
        let caller = backend.caller(token)?;
        Ok(backend
            .complaints
            .iter()
            .filter(|c| caller.role().is_admin() || c.owner() == Some(caller.id()))
            .cloned()
            .collect())
    }

    async fn create_complaint(
        &self,
        token: &AccessToken,
        complaint: &NewComplaint,
    ) -> Result<Complaint, Error> {
        let mut backend = self.backend();
        backend.begin(FixtureOperation::CreateComplaint)?;
        let caller = backend.caller(token)?;
        let id = backend.allocate_complaint_id();
        let created = Complaint::builder(id, Utc::now())
            .owner(caller.id())
            .title(complaint.title())
            .category(complaint.category())
            .description(complaint.description())
            .status(ComplaintStatus::Pending)
            .build();
        backend.complaints.push(created.clone());
        Ok(created)
    }

    async fn update_status(
        &self,
        token: &AccessToken,
        id: ComplaintId,
        status: ComplaintStatus,
    ) -> Result<Complaint, Error> {
        let mut backend = self.backend();
        backend.begin(FixtureOperation::UpdateStatus)?;
        let caller = backend.caller(token)?;
        let index = backend.position(id)?;
        if !caller.role().is_admin() {
            return Err(Error::forbidden("Students cannot update complaint status"));
        }
        let current = &backend.complaints[index];
        let updated = Complaint::builder(current.id(), current.created_at())
            .title(current.title())
            .category(current.category())
            .description(current.description())
            .status(status)
            .updated_at(Some(Utc::now()));
        let updated = match current.owner() {
            Some(owner) => updated.owner(owner),
            None => updated,
        }
        .build();
        backend.complaints[index] = updated.clone();
        Ok(updated)
    }

    async fn fetch_complaint(
        &self,
        token: &AccessToken,
        id: ComplaintId,
    ) -> Result<Complaint, Error> {
        let mut backend = self.backend();
        backend.begin(FixtureOperation::FetchComplaint)?;
        let caller = backend.caller(token)?;
        let index = backend.position(id)?;
        let complaint = &backend.complaints[index];
        if !caller.role().is_admin() && complaint.owner() != Some(caller.id()) {
            return Err(Error::forbidden("Not authorized to access this complaint"));
        }
        Ok(complaint.clone())
    }

    async fn delete_complaint(&self, token: &AccessToken, id: ComplaintId) -> Result<(), Error> {
        let mut backend = self.backend();
        backend.begin(FixtureOperation::DeleteComplaint)?;
        let caller = backend.caller(token)?;
        let index = backend.position(id)?;
        if !caller.role().is_admin() && backend.complaints[index].owner() != Some(caller.id()) {
            return Err(Error::forbidden("Not authorized to delete this complaint"));
        }
        backend.complaints.remove(index);
        Ok(())
    }

    async fn list_users(&self, token: &AccessToken) -> Result<Vec<User>, Error> {
        let mut backend = self.backend();
        backend.begin(FixtureOperation::ListUsers)?;
        let caller = backend.caller(token)?;
        if !caller.role().is_admin() {
            return Err(Error::forbidden("Access denied"));
        }
        Ok(backend.accounts.iter().map(|a| a.user.clone()).collect())
    }
}
