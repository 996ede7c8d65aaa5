//! Baseline reference data for a fresh installation.
//!
//! Seeds ministries with their departments and agencies, cabinet committees
//! and user accounts. Every account receives the same initial password,
//! hashed once with bcrypt. Rows that already exist are left untouched, so
//! the seed can be re-run safely.

use anyhow::Context;
use sqlx::{PgConnection, PgPool};
use tracing::{debug, info};

use crate::auth::{
    password::hash_password,
    repo_types::{AccountStatus, Role},
};

#[derive(Debug, Clone)]
pub struct SeedMinistry {
    pub code: &'static str,
    pub name: &'static str,
    pub departments: &'static [&'static str],
    /// `(name, acronym)`
    pub agencies: &'static [(&'static str, &'static str)],
}

#[derive(Debug, Clone)]
pub struct SeedCommittee {
    pub name: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone)]
pub struct SeedAccount {
    pub name: &'static str,
    pub email: &'static str,
    pub role: Role,
    pub status: AccountStatus,
}

pub fn default_accounts() -> Vec<SeedAccount> {
    vec![
        SeedAccount {
            name: "System Administrator",
            email: "admin@cabinet.go.ke",
            role: Role::Admin,
            status: AccountStatus::Active,
        },
        SeedAccount {
            name: "The President",
            email: "president@cabinet.go.ke",
            role: Role::President,
            status: AccountStatus::Active,
        },
        SeedAccount {
            name: "The Deputy President",
            email: "deputy.president@cabinet.go.ke",
            role: Role::DeputyPresident,
            status: AccountStatus::Active,
        },
        SeedAccount {
            name: "Cabinet Secretary, National Treasury",
            email: "cs.treasury@cabinet.go.ke",
            role: Role::CabinetSecretary,
            status: AccountStatus::Active,
        },
        SeedAccount {
            name: "Cabinet Secretary, Interior",
            email: "cs.interior@cabinet.go.ke",
            role: Role::CabinetSecretary,
            status: AccountStatus::Active,
        },
        SeedAccount {
            name: "Principal Secretary, Cabinet Affairs",
            email: "ps.cabinet@cabinet.go.ke",
            role: Role::PrincipalSecretary,
            status: AccountStatus::Active,
        },
        SeedAccount {
            name: "Cabinet Office Secretariat",
            email: "secretariat@cabinet.go.ke",
            role: Role::CabinetOffice,
            status: AccountStatus::Pending,
        },
    ]
}

pub fn default_ministries() -> Vec<SeedMinistry> {
    vec![
        SeedMinistry {
            code: "INTERIOR",
            name: "Ministry of Interior and National Administration",
            departments: &[
                "State Department for Internal Security",
                "State Department for Immigration",
            ],
            agencies: &[
                ("National Police Service", "NPS"),
                ("National Registration Bureau", "NRB"),
            ],
        },
        SeedMinistry {
            code: "TREASURY",
            name: "The National Treasury and Economic Planning",
            departments: &[
                "State Department for Economic Planning",
                "Public Debt Management Office",
            ],
            agencies: &[
                ("Kenya Revenue Authority", "KRA"),
                ("Kenya National Bureau of Statistics", "KNBS"),
            ],
        },
        SeedMinistry {
            code: "HEALTH",
            name: "Ministry of Health",
            departments: &[
                "State Department for Medical Services",
                "State Department for Public Health",
            ],
            agencies: &[("Kenya Medical Supplies Authority", "KEMSA")],
        },
        SeedMinistry {
            code: "EDUCATION",
            name: "Ministry of Education",
            departments: &[
                "State Department for Basic Education",
                "State Department for Higher Education",
            ],
            agencies: &[("Kenya National Examinations Council", "KNEC")],
        },
    ]
}

pub fn default_committees() -> Vec<SeedCommittee> {
    vec![
        SeedCommittee {
            name: "Cabinet Committee on Economy",
            description: "Fiscal policy, budget and economic planning",
        },
        SeedCommittee {
            name: "Cabinet Committee on Security",
            description: "Internal security and national administration",
        },
        SeedCommittee {
            name: "Cabinet Committee on Social Services",
            description: "Health, education and social protection",
        },
    ]
}

/// Rows inserted by one [`run`]; already-present rows are not counted.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub ministries: u64,
    pub departments: u64,
    pub agencies: u64,
    pub committees: u64,
    pub users: u64,
}

/// Seeds reference data and `accounts` in one transaction.
pub async fn run(
    db: &PgPool,
    ministries: &[SeedMinistry],
    committees: &[SeedCommittee],
    accounts: &[SeedAccount],
    password: &str,
    cost: u32,
) -> anyhow::Result<SeedReport> {
    anyhow::ensure!(!password.is_empty(), "seed password must not be empty");
    let hash = hash_password(password, cost)?;

    let mut tx = db.begin().await.context("begin tx")?;
    let mut report = SeedReport::default();
    for ministry in ministries {
        seed_ministry(&mut tx, ministry, &mut report).await?;
    }
    for committee in committees {
        report.committees += seed_committee(&mut tx, committee).await?;
    }
    for account in accounts {
        report.users += seed_account(&mut tx, account, &hash).await?;
    }
    tx.commit().await.context("commit tx")?;

    Ok(report)
}

async fn seed_ministry(
    conn: &mut PgConnection,
    ministry: &SeedMinistry,
    report: &mut SeedReport,
) -> anyhow::Result<()> {
    let result = sqlx::query(
        r#"
        INSERT INTO ministries (code, name)
        VALUES ($1, $2)
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(ministry.code)
    .bind(ministry.name)
    .execute(&mut *conn)
    .await
    .with_context(|| format!("insert ministry {}", ministry.code))?;
    report.ministries += result.rows_affected();

    for &department in ministry.departments {
        let result = sqlx::query(
            r#"
            INSERT INTO departments (ministry_id, name)
            SELECT id, $2 FROM ministries WHERE code = $1
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(ministry.code)
        .bind(department)
        .execute(&mut *conn)
        .await
        .with_context(|| format!("insert department {department}"))?;
        report.departments += result.rows_affected();
    }

    for &(name, acronym) in ministry.agencies {
        let result = sqlx::query(
            r#"
            INSERT INTO agencies (ministry_id, name, acronym)
            SELECT id, $2, $3 FROM ministries WHERE code = $1
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(ministry.code)
        .bind(name)
        .bind(acronym)
        .execute(&mut *conn)
        .await
        .with_context(|| format!("insert agency {acronym}"))?;
        report.agencies += result.rows_affected();
    }

    debug!(code = ministry.code, "ministry seeded");
    Ok(())
}

async fn seed_committee(
    conn: &mut PgConnection,
    committee: &SeedCommittee,
) -> anyhow::Result<u64> {
    let result = sqlx::query(
        r#"
        INSERT INTO committees (name, description)
        VALUES ($1, $2)
        ON CONFLICT (name) DO NOTHING
        "#,
    )
    .bind(committee.name)
    .bind(committee.description)
    .execute(&mut *conn)
    .await
    .with_context(|| format!("insert committee {}", committee.name))?;
    Ok(result.rows_affected())
}

async fn seed_account(
    conn: &mut PgConnection,
    account: &SeedAccount,
    hash: &str,
) -> anyhow::Result<u64> {
    let result = sqlx::query(
        r#"
        INSERT INTO users (name, email, password, role, status)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT ((LOWER(email))) DO NOTHING
        "#,
    )
    .bind(account.name)
    .bind(account.email.to_lowercase())
    .bind(hash)
    .bind(account.role.as_str())
    .bind(account.status.as_str())
    .execute(&mut *conn)
    .await
    .with_context(|| format!("insert seed account {}", account.email))?;

    if result.rows_affected() > 0 {
        info!(email = account.email, role = %account.role, "seeded account");
    }
    Ok(result.rows_affected())
}
