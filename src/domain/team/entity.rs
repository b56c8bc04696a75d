//! Team entity and related types

use std::str::FromStr;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::{validate_member_count, validate_team_name, TeamValidationError};
use crate::domain::user::UserId;

/// Team identifier (UUID v4)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamId(Uuid);

impl TeamId {
    /// Generate a fresh identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an identifier from its string form
    pub fn parse(id: &str) -> Result<Self, TeamValidationError> {
        Uuid::parse_str(id)
            .map(Self)
            .map_err(|_| TeamValidationError::InvalidId(id.to_string()))
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for TeamId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for TeamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

static REGISTRATION_NUMBER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^TEAM\d{4,}$").unwrap());

/// Human-readable team registration number: `TEAM` + zero-padded counter
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RegistrationNumber(String);

impl RegistrationNumber {
    pub const PREFIX: &'static str = "TEAM";

    /// Format a counter value, e.g. 1 -> `TEAM0001`
    pub fn from_counter(counter: u64) -> Self {
        Self(format!("{}{:04}", Self::PREFIX, counter))
    }

    /// Parse and validate an existing registration number
    pub fn parse(value: impl Into<String>) -> Result<Self, TeamValidationError> {
        let value = value.into();

        if !REGISTRATION_NUMBER_PATTERN.is_match(&value) {
            return Err(TeamValidationError::InvalidRegistrationNumber(value));
        }

        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RegistrationNumber {
    type Error = TeamValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<RegistrationNumber> for String {
    fn from(number: RegistrationNumber) -> Self {
        number.0
    }
}

impl std::fmt::Display for RegistrationNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Declared team category constraining member count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeClass {
    Solo,
    Duo,
    Team,
}

impl FromStr for SizeClass {
    type Err = TeamValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "solo" => Ok(Self::Solo),
            "duo" => Ok(Self::Duo),
            "team" => Ok(Self::Team),
            other => Err(TeamValidationError::InvalidSizeClass(other.to_string())),
        }
    }
}

impl std::fmt::Display for SizeClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Solo => write!(f, "solo"),
            Self::Duo => write!(f, "duo"),
            Self::Team => write!(f, "team"),
        }
    }
}

/// Admin approval of a team's participation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl FromStr for ApprovalStatus {
    type Err = TeamValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            other => Err(TeamValidationError::InvalidApprovalStatus(other.to_string())),
        }
    }
}

impl std::fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Approved => write!(f, "approved"),
            Self::Rejected => write!(f, "rejected"),
        }
    }
}

/// Verification state of the attached payment proof
///
/// Admins may move between any two states; attaching a new proof always
/// returns the team to `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Verified,
    Rejected,
}

impl FromStr for PaymentStatus {
    type Err = TeamValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "verified" => Ok(Self::Verified),
            "rejected" => Ok(Self::Rejected),
            other => Err(TeamValidationError::InvalidPaymentStatus(other.to_string())),
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Verified => write!(f, "verified"),
            Self::Rejected => write!(f, "rejected"),
        }
    }
}

/// Uploaded payment screenshot: public URL plus the handle used to delete it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentProof {
    pub url: String,
    pub storage_handle: String,
}

impl PaymentProof {
    pub fn new(url: impl Into<String>, storage_handle: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            storage_handle: storage_handle.into(),
        }
    }
}

/// Team aggregate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    id: TeamId,
    name: String,
    leader: UserId,
    /// Additional members, leader excluded, in submission order
    members: Vec<UserId>,
    problem_statement: String,
    size_class: SizeClass,
    approval_status: ApprovalStatus,
    registration_number: RegistrationNumber,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    payment_proof: Option<PaymentProof>,
    payment_status: PaymentStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Team {
    /// Create a new team, checking name, size class bounds and member uniqueness
    pub fn new(
        id: TeamId,
        name: impl Into<String>,
        leader: UserId,
        members: Vec<UserId>,
        problem_statement: impl Into<String>,
        size_class: SizeClass,
        registration_number: RegistrationNumber,
    ) -> Result<Self, TeamValidationError> {
        let name = name.into().trim().to_string();
        validate_team_name(&name)?;
        validate_member_count(size_class, members.len())?;

        if members.contains(&leader) {
            return Err(TeamValidationError::LeaderListedAsMember);
        }

        for (index, member) in members.iter().enumerate() {
            if members[..index].contains(member) {
                return Err(TeamValidationError::DuplicateMember);
            }
        }

        let now = Utc::now();

        Ok(Self {
            id,
            name,
            leader,
            members,
            problem_statement: problem_statement.into().trim().to_string(),
            size_class,
            approval_status: ApprovalStatus::Pending,
            registration_number,
            payment_proof: None,
            payment_status: PaymentStatus::Pending,
            created_at: now,
            updated_at: now,
        })
    }

    // Getters

    pub fn id(&self) -> &TeamId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Key used for case-insensitive name uniqueness
    pub fn name_key(&self) -> String {
        team_name_key(&self.name)
    }

    pub fn leader(&self) -> &UserId {
        &self.leader
    }

    pub fn members(&self) -> &[UserId] {
        &self.members
    }

    pub fn problem_statement(&self) -> &str {
        &self.problem_statement
    }

    pub fn size_class(&self) -> SizeClass {
        self.size_class
    }

    pub fn approval_status(&self) -> ApprovalStatus {
        self.approval_status
    }

    pub fn registration_number(&self) -> &RegistrationNumber {
        &self.registration_number
    }

    pub fn payment_proof(&self) -> Option<&PaymentProof> {
        self.payment_proof.as_ref()
    }

    pub fn payment_status(&self) -> PaymentStatus {
        self.payment_status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Leader followed by members
    pub fn participants(&self) -> Vec<UserId> {
        std::iter::once(self.leader)
            .chain(self.members.iter().copied())
            .collect()
    }

    /// Check whether the user is the leader or a member
    pub fn has_participant(&self, user_id: &UserId) -> bool {
        self.leader == *user_id || self.members.contains(user_id)
    }

    // Mutators

    /// Attach a new payment proof, returning the superseded one
    ///
    /// Always resets the payment status to `Pending`.
    pub fn attach_payment_proof(&mut self, proof: PaymentProof) -> Option<PaymentProof> {
        let previous = self.payment_proof.replace(proof);
        self.payment_status = PaymentStatus::Pending;
        self.touch();
        previous
    }

    pub fn set_payment_status(&mut self, status: PaymentStatus) {
        self.payment_status = status;
        self.touch();
    }

    pub fn set_approval_status(&mut self, status: ApprovalStatus) {
        self.approval_status = status;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Normalize a team name into its uniqueness key
pub fn team_name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn users(count: usize) -> Vec<UserId> {
        (0..count).map(|_| UserId::generate()).collect()
    }

    fn create_team(size_class: SizeClass, members: Vec<UserId>) -> Result<Team, TeamValidationError> {
        Team::new(
            TeamId::generate(),
            "Falcons",
            UserId::generate(),
            members,
            "PS-01",
            size_class,
            RegistrationNumber::from_counter(1),
        )
    }

    #[test]
    fn test_registration_number_format() {
        assert_eq!(RegistrationNumber::from_counter(1).as_str(), "TEAM0001");
        assert_eq!(RegistrationNumber::from_counter(42).as_str(), "TEAM0042");
        assert_eq!(RegistrationNumber::from_counter(9999).as_str(), "TEAM9999");
        assert_eq!(RegistrationNumber::from_counter(10000).as_str(), "TEAM10000");
    }

    #[test]
    fn test_registration_number_parse() {
        assert!(RegistrationNumber::parse("TEAM0001").is_ok());
        assert!(RegistrationNumber::parse("TEAM001").is_err());
        assert!(RegistrationNumber::parse("team0001").is_err());
        assert!(RegistrationNumber::parse("TEAMABCD").is_err());
    }

    #[test]
    fn test_size_class_parse() {
        assert_eq!("Solo".parse::<SizeClass>().unwrap(), SizeClass::Solo);
        assert_eq!("duo".parse::<SizeClass>().unwrap(), SizeClass::Duo);
        assert_eq!(" TEAM ".parse::<SizeClass>().unwrap(), SizeClass::Team);
        assert!("squad".parse::<SizeClass>().is_err());
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("verified".parse::<PaymentStatus>().unwrap(), PaymentStatus::Verified);
        assert!("paid".parse::<PaymentStatus>().is_err());
        assert_eq!("approved".parse::<ApprovalStatus>().unwrap(), ApprovalStatus::Approved);
        assert!("verified".parse::<ApprovalStatus>().is_err());
    }

    #[test]
    fn test_team_creation_defaults() {
        let team = create_team(SizeClass::Duo, users(1)).unwrap();

        assert_eq!(team.name(), "Falcons");
        assert_eq!(team.approval_status(), ApprovalStatus::Pending);
        assert_eq!(team.payment_status(), PaymentStatus::Pending);
        assert!(team.payment_proof().is_none());
        assert_eq!(team.participants().len(), 2);
    }

    #[test]
    fn test_team_rejects_bad_member_counts() {
        assert!(create_team(SizeClass::Solo, users(1)).is_err());
        assert!(create_team(SizeClass::Duo, users(2)).is_err());
        assert!(create_team(SizeClass::Team, users(1)).is_err());
        assert!(create_team(SizeClass::Team, users(5)).is_err());
        assert!(create_team(SizeClass::Team, users(4)).is_ok());
    }

    #[test]
    fn test_team_rejects_leader_as_member() {
        let leader = UserId::generate();
        let result = Team::new(
            TeamId::generate(),
            "Falcons",
            leader,
            vec![leader],
            "PS-01",
            SizeClass::Duo,
            RegistrationNumber::from_counter(1),
        );

        assert_eq!(result.unwrap_err(), TeamValidationError::LeaderListedAsMember);
    }

    #[test]
    fn test_team_rejects_duplicate_members() {
        let member = UserId::generate();
        let result = create_team(SizeClass::Team, vec![member, member]);

        assert_eq!(result.unwrap_err(), TeamValidationError::DuplicateMember);
    }

    #[test]
    fn test_has_participant() {
        let members = users(2);
        let team = create_team(SizeClass::Team, members.clone()).unwrap();

        assert!(team.has_participant(team.leader()));
        assert!(team.has_participant(&members[1]));
        assert!(!team.has_participant(&UserId::generate()));
    }

    #[test]
    fn test_attach_payment_proof_resets_status() {
        let mut team = create_team(SizeClass::Solo, vec![]).unwrap();

        for status in [PaymentStatus::Pending, PaymentStatus::Verified, PaymentStatus::Rejected] {
            team.set_payment_status(status);
            team.attach_payment_proof(PaymentProof::new("https://cdn/x.webp", "x"));
            assert_eq!(team.payment_status(), PaymentStatus::Pending);
        }
    }

    #[test]
    fn test_attach_payment_proof_returns_previous() {
        let mut team = create_team(SizeClass::Solo, vec![]).unwrap();

        let first = team.attach_payment_proof(PaymentProof::new("https://cdn/a.webp", "a"));
        assert!(first.is_none());

        let second = team.attach_payment_proof(PaymentProof::new("https://cdn/b.webp", "b"));
        assert_eq!(second.unwrap().storage_handle, "a");
        assert_eq!(team.payment_proof().unwrap().storage_handle, "b");
    }

    #[test]
    fn test_admin_transitions_are_unrestricted() {
        let mut team = create_team(SizeClass::Solo, vec![]).unwrap();

        team.set_payment_status(PaymentStatus::Verified);
        team.set_payment_status(PaymentStatus::Rejected);
        team.set_payment_status(PaymentStatus::Verified);
        team.set_payment_status(PaymentStatus::Pending);
        assert_eq!(team.payment_status(), PaymentStatus::Pending);

        team.set_approval_status(ApprovalStatus::Approved);
        assert_eq!(team.approval_status(), ApprovalStatus::Approved);
    }

    #[test]
    fn test_team_serialization_roundtrip() {
        let mut team = create_team(SizeClass::Duo, users(1)).unwrap();
        team.attach_payment_proof(PaymentProof::new("https://cdn/a.webp", "a"));

        let json = serde_json::to_value(&team).unwrap();
        assert_eq!(json["size_class"], "duo");
        assert_eq!(json["registration_number"], "TEAM0001");

        let restored: Team = serde_json::from_value(json).unwrap();
        assert_eq!(restored.payment_proof(), team.payment_proof());
    }

    #[test]
    fn test_name_key_is_case_insensitive() {
        assert_eq!(team_name_key("  Falcons "), team_name_key("FALCONS"));
    }
}
