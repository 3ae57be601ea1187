//! User data model.
//!
//! Users are created at registration and are read-only from the client's
//! perspective afterwards; the profile is only ever re-fetched.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Validation errors returned when building a [`Registration`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    /// Name was blank once trimmed.
    EmptyName,
    /// Email was blank once trimmed.
    EmptyEmail,
    /// Email lacked a local part, an `@`, or a domain.
    InvalidEmail,
    /// Roll number was blank once trimmed.
    EmptyRollNumber,
    /// Password was empty.
    EmptyPassword,
    /// Hostel name did not match one of the fixed hostels.
    UnknownHostel {
        /// The rejected input.
        value: String,
    },
    /// Role string was neither `student` nor `admin`.
    UnknownRole {
        /// The rejected input.
        value: String,
    },
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "name must not be empty"),
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::InvalidEmail => write!(f, "email must look like name@domain"),
            Self::EmptyRollNumber => write!(f, "roll number must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
            Self::UnknownHostel { value } => write!(
                f,
                "unknown hostel '{value}'; expected one of {}",
                Hostel::ALL.map(Hostel::as_str).join(", ")
            ),
            Self::UnknownRole { value } => {
                write!(f, "unknown role '{value}'; expected student or admin")
            }
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Server-assigned user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    /// Wrap a raw identifier.
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Raw integer value.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Role gating which complaint operations a session may perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Submits complaints and sees only their own.
    Student,
    /// Sees every complaint and may change its status.
    Admin,
}

impl Role {
    /// Wire representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Admin => "admin",
        }
    }

    /// Whether this role may transition complaint status.
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UserValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "student" => Ok(Self::Student),
            "admin" => Ok(Self::Admin),
            _ => Err(UserValidationError::UnknownRole {
                value: s.to_owned(),
            }),
        }
    }
}

/// One of the six hostels a student may live in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Hostel {
    /// Saffire hostel.
    Saffire,
    /// Emerald hostel.
    Emerald,
    /// Coral hostel.
    Coral,
    /// Diamond hostel.
    Diamond,
    /// Ruby hostel.
    Ruby,
    /// New Ruby hostel.
    #[serde(rename = "New Ruby")]
    NewRuby,
}

impl Hostel {
    /// Every hostel in display order.
    pub const ALL: [Self; 6] = [
        Self::Saffire,
        Self::Emerald,
        Self::Coral,
        Self::Diamond,
        Self::Ruby,
        Self::NewRuby,
    ];

    /// Wire and display representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Saffire => "Saffire",
            Self::Emerald => "Emerald",
            Self::Coral => "Coral",
            Self::Diamond => "Diamond",
            Self::Ruby => "Ruby",
            Self::NewRuby => "New Ruby",
        }
    }
}

impl fmt::Display for Hostel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Hostel {
    type Err = UserValidationError;

    /// Case-insensitive; `New Ruby`, `new-ruby`, and `new_ruby` all parse.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', '_'], " ");
        Self::ALL
            .into_iter()
            .find(|hostel| hostel.as_str().to_ascii_lowercase() == normalized)
            .ok_or_else(|| UserValidationError::UnknownHostel {
                value: s.to_owned(),
            })
    }
}

/// Application user as returned by the profile endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    id: UserId,
    name: String,
    email: String,
    roll_number: String,
    hostel: Option<Hostel>,
    room_number: Option<String>,
    role: Role,
}

impl User {
    /// Start building a user with the required identity fields.
    pub fn builder(id: UserId, email: impl Into<String>) -> UserBuilder {
        UserBuilder {
            user: Self {
                id,
                name: String::new(),
                email: email.into(),
                roll_number: String::new(),
                hostel: None,
                room_number: None,
                role: Role::Student,
            },
        }
    }

    /// Server-assigned identifier.
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Full name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Unique email address.
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Unique institute roll number.
    pub fn roll_number(&self) -> &str {
        &self.roll_number
    }

    /// Hostel of residence, when recorded.
    pub fn hostel(&self) -> Option<Hostel> {
        self.hostel
    }

    /// Room number, when recorded.
    pub fn room_number(&self) -> Option<&str> {
        self.room_number.as_deref()
    }

    /// Access role.
    pub fn role(&self) -> Role {
        self.role
    }
}

/// Builder for [`User`]; adapters and fixtures use it to assemble profiles.
#[derive(Debug, Clone)]
pub struct UserBuilder {
    user: User,
}

impl UserBuilder {
    /// Set the full name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.user.name = name.into();
        self
    }

    /// Set the roll number.
    #[must_use]
    pub fn roll_number(mut self, roll_number: impl Into<String>) -> Self {
        self.user.roll_number = roll_number.into();
        self
    }

    /// Set the hostel.
    #[must_use]
    pub fn hostel(mut self, hostel: Option<Hostel>) -> Self {
        self.user.hostel = hostel;
        self
    }

    /// Set the room number.
    #[must_use]
    pub fn room_number(mut self, room_number: Option<String>) -> Self {
        self.user.room_number = room_number;
        self
    }

    /// Set the role.
    #[must_use]
    pub fn role(mut self, role: Role) -> Self {
        self.user.role = role;
        self
    }

    /// Finish building.
    pub fn build(self) -> User {
        self.user
    }
}

/// Validated registration profile sent to the register endpoint.
///
/// ## Invariants
/// - `name`, `email`, and `roll_number` are trimmed and non-empty.
/// - `email` contains exactly one `@` with text on both sides.
/// - `password` is non-empty; whitespace is preserved.
/// - blank `room_number` is normalised to `None`.
#[derive(Clone, PartialEq, Eq)]
pub struct Registration {
    name: String,
    email: String,
    roll_number: String,
    password: zeroize::Zeroizing<String>,
    hostel: Option<Hostel>,
    room_number: Option<String>,
}

/// Raw registration form values prior to validation.
#[derive(Debug, Clone, Copy)]
pub struct RegistrationInput<'a> {
    /// Full name.
    pub name: &'a str,
    /// Email address.
    pub email: &'a str,
    /// Roll number.
    pub roll_number: &'a str,
    /// Password.
    pub password: &'a str,
    /// Hostel name; blank means not provided.
    pub hostel: &'a str,
    /// Room number; blank means not provided.
    pub room_number: &'a str,
}

impl Registration {
    /// Validate raw form values.
    ///
    /// # Examples
    /// ```
    /// use portal::domain::{Hostel, Registration, RegistrationInput};
    ///
    /// let registration = Registration::try_from_input(RegistrationInput {
    ///     name: "Asha Rao",
    ///     email: "asha@example.edu",
    ///     roll_number: "21CS042",
    ///     password: "hunter2",
    ///     hostel: "new ruby",
    ///     room_number: "B-114",
    /// })
    /// .expect("valid registration");
    /// assert_eq!(registration.hostel(), Some(Hostel::NewRuby));
    /// ```
    pub fn try_from_input(input: RegistrationInput<'_>) -> Result<Self, UserValidationError> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(UserValidationError::EmptyName);
        }
        let email = normalize_email(input.email)?;
        let roll_number = input.roll_number.trim();
        if roll_number.is_empty() {
            return Err(UserValidationError::EmptyRollNumber);
        }
        if input.password.is_empty() {
            return Err(UserValidationError::EmptyPassword);
        }
        let hostel = match input.hostel.trim() {
            "" => None,
            raw => Some(raw.parse::<Hostel>()?),
        };
        let room_number = Some(input.room_number.trim())
            .filter(|room| !room.is_empty())
            .map(str::to_owned);

        Ok(Self {
            name: name.to_owned(),
            email,
            roll_number: roll_number.to_owned(),
            password: zeroize::Zeroizing::new(input.password.to_owned()),
            hostel,
            room_number,
        })
    }

    /// Full name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Email address.
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Roll number.
    pub fn roll_number(&self) -> &str {
        &self.roll_number
    }

    /// Password in clear text, for the request body only.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    /// Chosen hostel.
    pub fn hostel(&self) -> Option<Hostel> {
        self.hostel
    }

    /// Room number.
    pub fn room_number(&self) -> Option<&str> {
        self.room_number.as_deref()
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("roll_number", &self.roll_number)
            .field("password", &"<redacted>")
            .field("hostel", &self.hostel)
            .field("room_number", &self.room_number)
            .finish()
    }
}

pub(crate) fn normalize_email(raw: &str) -> Result<String, UserValidationError> {
    let email = raw.trim();
    if email.is_empty() {
        return Err(UserValidationError::EmptyEmail);
    }
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() && !domain.contains('@') => {
            Ok(email.to_owned())
        }
        _ => Err(UserValidationError::InvalidEmail),
    }
}
