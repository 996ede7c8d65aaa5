use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// User record in the database.
#[derive(Debug, Clone, FromRow)]
pub struct UserRecord {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[sqlx(rename = "password")]
    pub password_hash: String, // bcrypt, never leaves the verifier
    pub role: String,
    pub status: String,
    pub last_login: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Role {
    #[serde(rename = "President")]
    President,
    #[serde(rename = "Deputy President")]
    DeputyPresident,
    #[serde(rename = "Cabinet Secretary")]
    CabinetSecretary,
    #[serde(rename = "Principal Secretary")]
    PrincipalSecretary,
    #[serde(rename = "Cabinet Office")]
    CabinetOffice,
    #[serde(rename = "Admin")]
    Admin,
}

impl Role {
    pub const ALL: [Role; 6] = [
        Role::President,
        Role::DeputyPresident,
        Role::CabinetSecretary,
        Role::PrincipalSecretary,
        Role::CabinetOffice,
        Role::Admin,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::President => "President",
            Role::DeputyPresident => "Deputy President",
            Role::CabinetSecretary => "Cabinet Secretary",
            Role::PrincipalSecretary => "Principal Secretary",
            Role::CabinetOffice => "Cabinet Office",
            Role::Admin => "Admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| anyhow::anyhow!("unrecognized role {s:?}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountStatus {
    Active,
    Inactive,
    Pending,
    Suspended,
}

impl AccountStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AccountStatus::Active => "active",
            AccountStatus::Inactive => "inactive",
            AccountStatus::Pending => "pending",
            AccountStatus::Suspended => "suspended",
        }
    }

    pub fn can_authenticate(self) -> bool {
        self == AccountStatus::Active
    }
}

impl FromStr for AccountStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(AccountStatus::Active),
            "inactive" => Ok(AccountStatus::Inactive),
            "pending" => Ok(AccountStatus::Pending),
            "suspended" => Ok(AccountStatus::Suspended),
            other => anyhow::bail!("unrecognized account status {other:?}"),
        }
    }
}

/// Public part of the user returned to callers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PublicUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_names_round_trip_through_from_str() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert!("Janitor".parse::<Role>().is_err());
    }

    #[test]
    fn role_serializes_with_display_name() {
        let json = serde_json::to_string(&Role::CabinetSecretary).unwrap();
        assert_eq!(json, "\"Cabinet Secretary\"");
    }

    #[test]
    fn only_active_status_can_authenticate() {
        assert!(AccountStatus::Active.can_authenticate());
        for status in ["inactive", "pending", "suspended"] {
            let parsed: AccountStatus = status.parse().unwrap();
            assert!(!parsed.can_authenticate());
            assert_eq!(parsed.as_str(), status);
        }
        assert!("ACTIVE".parse::<AccountStatus>().is_err());
    }

    #[test]
    fn public_user_has_no_password_field() {
        let user = PublicUser {
            id: Uuid::new_v4(),
            name: "Jane Doe".into(),
            email: "jane@gov.go.ke".into(),
            role: Role::Admin,
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password").is_none());
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["role"], "Admin");
    }
}
