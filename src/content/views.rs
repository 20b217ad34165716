//! Aggregated read models served by the portfolio, profile and dashboard
//! endpoints

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::{Experience, HeroSection, MainFooter, MainHeader, Project, Record, Skill, SocialAccount};
use crate::auth::user::User;

/// What visitors may see about a user
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            created_at: user.created_at,
        }
    }
}

/// A header, hero or footer with its social accounts resolved
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionView<T> {
    #[serde(flatten)]
    pub section: Record<T>,
    pub social_accounts: Vec<Record<SocialAccount>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioView {
    pub user: PublicUser,
    pub header: Option<SectionView<MainHeader>>,
    pub hero: Option<SectionView<HeroSection>>,
    pub footer: Option<SectionView<MainFooter>>,
    pub projects: Vec<Record<Project>>,
    pub skills: Vec<Record<Skill>>,
    pub experiences: Vec<Record<Experience>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    #[serde(flatten)]
    pub user: PublicUser,
    pub social_accounts: Vec<Record<SocialAccount>>,
}

/// Owner dashboard counters
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub projects: usize,
    pub skills: usize,
    pub experiences: usize,
    pub messages: usize,
    pub unread_messages: usize,
    pub social_accounts: usize,
}
