//! Team registry: registration and membership lookups

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::team::{
    validate_member_count, validate_problem_statement, validate_team_name, ApprovalStatus,
    SizeClass, Team, TeamId, TeamQuery, TeamRepository, TeamValidationError,
};
use crate::domain::user::{normalize_email, normalize_registration_number, UserId, UserRepository};
use crate::domain::DomainError;

use super::view::{load_team_view, load_team_views, TeamView};

/// Identifies a member by the pair they registered with
#[derive(Debug, Clone)]
pub struct MemberIdentifier {
    pub email: String,
    pub registration_number: String,
}

impl MemberIdentifier {
    pub fn new(email: impl Into<String>, registration_number: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            registration_number: registration_number.into(),
        }
    }
}

/// Request for registering a team
#[derive(Debug, Clone)]
pub struct RegisterTeamRequest {
    pub team_name: String,
    /// Additional members; the requester is the leader and is not listed
    pub members: Vec<MemberIdentifier>,
    pub problem_statement: String,
    pub size_class: SizeClass,
}

/// Team registry enforcing composition and uniqueness rules
#[derive(Debug)]
pub struct TeamRegistry<T: TeamRepository + ?Sized, U: UserRepository + ?Sized> {
    teams: Arc<T>,
    users: Arc<U>,
}

impl<T: TeamRepository + ?Sized, U: UserRepository + ?Sized> TeamRegistry<T, U> {
    /// Create a new team registry
    pub fn new(teams: Arc<T>, users: Arc<U>) -> Self {
        Self { teams, users }
    }

    /// Register a team led by `requester`
    ///
    /// Checks run in a fixed order and the first failure wins: name taken,
    /// requester already in a team, member count, member resolution, members
    /// already in a team.
    pub async fn register_team(
        &self,
        requester: &UserId,
        request: RegisterTeamRequest,
    ) -> Result<TeamView, DomainError> {
        let team_name = request.team_name.trim().to_string();
        validate_team_name(&team_name)?;
        validate_problem_statement(&request.problem_statement)?;

        if request.members.iter().any(|m| {
            m.email.trim().is_empty() || m.registration_number.trim().is_empty()
        }) {
            return Err(DomainError::validation(
                "Each member requires an email and a registration number",
            ));
        }

        let leader = self
            .users
            .get(requester)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("User '{}' not found", requester)))?;

        if self.teams.find_by_name(&team_name).await?.is_some() {
            return Err(DomainError::conflict("Team name already exists"));
        }

        if self.teams.find_by_participant(requester).await?.is_some() {
            return Err(DomainError::conflict("You are already part of a team"));
        }

        validate_member_count(request.size_class, request.members.len())?;

        let members = self.resolve_members(&request.members).await?;

        if members.contains(leader.id()) {
            return Err(TeamValidationError::LeaderListedAsMember.into());
        }

        if !self.teams.participating_users(&members).await?.is_empty() {
            return Err(DomainError::conflict(
                "One or more members are already part of another team",
            ));
        }

        let registration_number = self.teams.next_registration_number().await?;

        let team = Team::new(
            TeamId::generate(),
            team_name,
            *leader.id(),
            members,
            request.problem_statement,
            request.size_class,
            registration_number,
        )?;

        let team = self.teams.create(team).await?;

        info!(
            team_id = %team.id(),
            registration_number = %team.registration_number(),
            size_class = %team.size_class(),
            members = team.members().len(),
            "Registered team"
        );

        load_team_view(self.users.as_ref(), &team).await
    }

    /// Resolve member identifiers to distinct user IDs, in submission order
    async fn resolve_members(
        &self,
        identifiers: &[MemberIdentifier],
    ) -> Result<Vec<UserId>, DomainError> {
        let mut resolved: Vec<UserId> = Vec::with_capacity(identifiers.len());

        for identifier in identifiers {
            let email = normalize_email(&identifier.email);
            let registration_number =
                normalize_registration_number(&identifier.registration_number);

            match self
                .users
                .find_by_identity(&email, &registration_number)
                .await?
            {
                Some(user) if !resolved.contains(user.id()) => resolved.push(*user.id()),
                Some(_) => {}
                None => debug!(email = %email, "Member identifier did not resolve"),
            }
        }

        if resolved.len() != identifiers.len() {
            return Err(DomainError::validation(
                "One or more members not found or details do not match",
            ));
        }

        Ok(resolved)
    }

    /// Approved teams, newest first
    pub async fn list_approved_teams(&self) -> Result<Vec<TeamView>, DomainError> {
        let teams = self
            .teams
            .list(&TeamQuery::new().with_approval_status(ApprovalStatus::Approved))
            .await?;

        load_team_views(self.users.as_ref(), &teams).await
    }

    /// The team the user leads or belongs to
    pub async fn find_team_for_user(&self, user_id: &UserId) -> Result<TeamView, DomainError> {
        let team = self
            .teams
            .find_by_participant(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("You are not part of any team"))?;

        load_team_view(self.users.as_ref(), &team).await
    }

    /// Number of registered teams
    pub async fn count(&self) -> Result<usize, DomainError> {
        self.teams.count(&TeamQuery::new()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::User;
    use crate::infrastructure::team::InMemoryTeamRepository;
    use crate::infrastructure::user::InMemoryUserRepository;
    use std::collections::HashSet;
    use tokio::task::JoinSet;

    struct Fixture {
        registry: TeamRegistry<InMemoryTeamRepository, InMemoryUserRepository>,
        teams: Arc<InMemoryTeamRepository>,
        users: Vec<User>,
    }

    async fn fixture(user_count: usize) -> Fixture {
        let teams = Arc::new(InMemoryTeamRepository::new());
        let users_repo = Arc::new(InMemoryUserRepository::new());
        let mut users = Vec::new();

        for i in 0..user_count {
            let user = User::new(
                UserId::generate(),
                format!("User {}", i),
                format!("user{}@example.com", i),
                format!("21BCE{:04}", i),
                "hash",
            );
            users_repo.create(user.clone()).await.unwrap();
            users.push(user);
        }

        Fixture {
            registry: TeamRegistry::new(teams.clone(), users_repo),
            teams,
            users,
        }
    }

    fn identifier(user: &User) -> MemberIdentifier {
        MemberIdentifier::new(user.email(), user.registration_number())
    }

    fn request(name: &str, members: Vec<MemberIdentifier>, size_class: SizeClass) -> RegisterTeamRequest {
        RegisterTeamRequest {
            team_name: name.to_string(),
            members,
            problem_statement: "Smart campus energy".to_string(),
            size_class,
        }
    }

    fn assert_message(result: Result<TeamView, DomainError>, expected: &str) {
        match result {
            Err(err) => assert!(
                err.to_string().contains(expected),
                "expected '{}', got '{}'",
                expected,
                err
            ),
            Ok(view) => panic!("expected error '{}', got team {}", expected, view.team_name),
        }
    }

    #[tokio::test]
    async fn test_register_team_assigns_first_number() {
        let f = fixture(3).await;

        let view = f
            .registry
            .register_team(
                f.users[0].id(),
                request(
                    "Falcons",
                    vec![identifier(&f.users[1]), identifier(&f.users[2])],
                    SizeClass::Team,
                ),
            )
            .await
            .unwrap();

        assert_eq!(view.registration_number, "TEAM0001");
        assert_eq!(view.approval_status, ApprovalStatus::Pending);
        assert_eq!(view.payment_status, crate::domain::team::PaymentStatus::Pending);
        assert_eq!(view.leader.id, *f.users[0].id());
        assert_eq!(view.members.len(), 2);
    }

    #[tokio::test]
    async fn test_member_identifiers_are_normalized() {
        let f = fixture(2).await;
        let member = MemberIdentifier::new(
            f.users[1].email().to_uppercase(),
            f.users[1].registration_number().to_lowercase(),
        );

        let view = f
            .registry
            .register_team(f.users[0].id(), request("Falcons", vec![member], SizeClass::Duo))
            .await
            .unwrap();

        assert_eq!(view.members[0].id, *f.users[1].id());
    }

    #[tokio::test]
    async fn test_duplicate_team_name_rejected() {
        let f = fixture(2).await;
        f.registry
            .register_team(f.users[0].id(), request("Falcons", vec![], SizeClass::Solo))
            .await
            .unwrap();

        let result = f
            .registry
            .register_team(f.users[1].id(), request(" falcons ", vec![], SizeClass::Solo))
            .await;

        assert!(matches!(result, Err(DomainError::Conflict { .. })));
        assert_message(result, "Team name already exists");
    }

    #[tokio::test]
    async fn test_requester_already_in_team() {
        let f = fixture(2).await;
        f.registry
            .register_team(
                f.users[0].id(),
                request("Falcons", vec![identifier(&f.users[1])], SizeClass::Duo),
            )
            .await
            .unwrap();

        let result = f
            .registry
            .register_team(f.users[1].id(), request("Hawks", vec![], SizeClass::Solo))
            .await;

        assert_message(result, "You are already part of a team");
    }

    #[tokio::test]
    async fn test_size_class_bounds() {
        let f = fixture(6).await;
        let leader = f.users[0].id();

        let solo = f
            .registry
            .register_team(
                leader,
                request("Alpha", vec![identifier(&f.users[1])], SizeClass::Solo),
            )
            .await;
        assert_message(solo, "Solo teams cannot have additional members");

        let duo = f
            .registry
            .register_team(leader, request("Bravo", vec![], SizeClass::Duo))
            .await;
        assert_message(duo, "Duo teams must have exactly 1 additional member");

        let team_short = f
            .registry
            .register_team(
                leader,
                request("Charlie", vec![identifier(&f.users[1])], SizeClass::Team),
            )
            .await;
        assert_message(team_short, "between 2 and 4");

        let five: Vec<_> = f.users[1..6].iter().map(identifier).collect();
        let team_long = f
            .registry
            .register_team(leader, request("Delta", five, SizeClass::Team))
            .await;
        assert!(matches!(team_long, Err(DomainError::Validation { .. })));

        assert_eq!(f.teams.count(&TeamQuery::new()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unknown_member_rejected() {
        let f = fixture(2).await;
        let wrong = MemberIdentifier::new(f.users[1].email(), "21BCE9999");

        let result = f
            .registry
            .register_team(f.users[0].id(), request("Falcons", vec![wrong], SizeClass::Duo))
            .await;

        assert_message(result, "One or more members not found or details do not match");
    }

    #[tokio::test]
    async fn test_duplicate_member_identifiers_collapse() {
        let f = fixture(2).await;

        let result = f
            .registry
            .register_team(
                f.users[0].id(),
                request(
                    "Falcons",
                    vec![identifier(&f.users[1]), identifier(&f.users[1])],
                    SizeClass::Team,
                ),
            )
            .await;

        assert_message(result, "One or more members not found or details do not match");
    }

    #[tokio::test]
    async fn test_leader_listed_as_member() {
        let f = fixture(1).await;

        let result = f
            .registry
            .register_team(
                f.users[0].id(),
                request("Falcons", vec![identifier(&f.users[0])], SizeClass::Duo),
            )
            .await;

        assert_message(result, "Team leader cannot be listed as a member");
    }

    #[tokio::test]
    async fn test_member_already_in_another_team() {
        let f = fixture(3).await;
        f.registry
            .register_team(f.users[0].id(), request("Falcons", vec![], SizeClass::Solo))
            .await
            .unwrap();

        // The first team's leader is listed as a member of the second
        let result = f
            .registry
            .register_team(
                f.users[1].id(),
                request("Hawks", vec![identifier(&f.users[0])], SizeClass::Duo),
            )
            .await;

        assert!(matches!(result, Err(DomainError::Conflict { .. })));
        assert_message(result, "One or more members are already part of another team");
        assert_eq!(f.teams.count(&TeamQuery::new()).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_invalid_input_rejected_before_lookups() {
        let f = fixture(1).await;

        let short = f
            .registry
            .register_team(f.users[0].id(), request("A", vec![], SizeClass::Solo))
            .await;
        assert!(matches!(short, Err(DomainError::Validation { .. })));

        let mut blank_statement = request("Falcons", vec![], SizeClass::Solo);
        blank_statement.problem_statement = "   ".to_string();
        let result = f.registry.register_team(f.users[0].id(), blank_statement).await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));

        let blank_member = MemberIdentifier::new("", "21BCE0001");
        let result = f
            .registry
            .register_team(
                f.users[0].id(),
                request("Falcons", vec![blank_member], SizeClass::Duo),
            )
            .await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_registration_numbers_are_unique() {
        let f = fixture(3).await;

        for (i, name) in ["Alpha", "Bravo", "Charlie"].iter().enumerate() {
            let view = f
                .registry
                .register_team(f.users[i].id(), request(name, vec![], SizeClass::Solo))
                .await
                .unwrap();
            assert_eq!(view.registration_number, format!("TEAM{:04}", i + 1));
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_registrations_with_same_name() {
        let f = Arc::new(fixture(8).await);

        let mut tasks = JoinSet::new();
        for i in 0..f.users.len() {
            let f = Arc::clone(&f);
            tasks.spawn(async move {
                f.registry
                    .register_team(f.users[i].id(), request("Falcons", vec![], SizeClass::Solo))
                    .await
            });
        }

        let mut registered = 0;
        while let Some(result) = tasks.join_next().await {
            match result.unwrap() {
                Ok(view) => {
                    registered += 1;
                    assert_eq!(view.team_name, "Falcons");
                }
                Err(DomainError::Conflict { message }) => {
                    assert_eq!(message, "Team name already exists")
                }
                Err(other) => panic!("expected conflict, got {:?}", other),
            }
        }

        assert_eq!(registered, 1);
        assert_eq!(f.registry.count().await.unwrap(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_registrations_get_distinct_numbers() {
        let f = Arc::new(fixture(8).await);

        let mut tasks = JoinSet::new();
        for i in 0..f.users.len() {
            let f = Arc::clone(&f);
            tasks.spawn(async move {
                f.registry
                    .register_team(
                        f.users[i].id(),
                        request(&format!("Team {}", i), vec![], SizeClass::Solo),
                    )
                    .await
            });
        }

        let mut numbers = HashSet::new();
        while let Some(result) = tasks.join_next().await {
            let view = result.unwrap().unwrap();
            assert!(numbers.insert(view.registration_number));
        }

        let expected: HashSet<String> = (1..=8).map(|n| format!("TEAM{:04}", n)).collect();
        assert_eq!(numbers, expected);
    }

    #[tokio::test]
    async fn test_find_team_for_user() {
        let f = fixture(3).await;
        let view = f
            .registry
            .register_team(
                f.users[0].id(),
                request("Falcons", vec![identifier(&f.users[1])], SizeClass::Duo),
            )
            .await
            .unwrap();

        let as_member = f.registry.find_team_for_user(f.users[1].id()).await.unwrap();
        assert_eq!(as_member.id, view.id);

        let outsider = f.registry.find_team_for_user(f.users[2].id()).await;
        assert!(matches!(outsider, Err(DomainError::NotFound { .. })));
        assert_message(outsider, "You are not part of any team");
    }

    #[tokio::test]
    async fn test_list_approved_teams_only() {
        let f = fixture(2).await;
        let first = f
            .registry
            .register_team(f.users[0].id(), request("Alpha", vec![], SizeClass::Solo))
            .await
            .unwrap();
        f.registry
            .register_team(f.users[1].id(), request("Bravo", vec![], SizeClass::Solo))
            .await
            .unwrap();

        let team_id = TeamId::parse(&first.id).unwrap();
        f.teams
            .set_approval_status(&team_id, ApprovalStatus::Approved)
            .await
            .unwrap();

        let approved = f.registry.list_approved_teams().await.unwrap();
        assert_eq!(approved.len(), 1);
        assert_eq!(approved[0].team_name, "Alpha");
    }
}
