//! Totals shown on the admin landing page

use log::warn;

use crate::error::Error;
use crate::models::{Education, Experience, Profile, Project, Skill};
use crate::profile::ProfileClient;
use crate::resource::{Resource, ResourceClient};
use crate::visitor::{VisitStats, VisitorClient};

/// Snapshot of everything the dashboard renders
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    pub profile: Profile,
    pub education: u64,
    pub experience: u64,
    pub projects: u64,
    pub skills: u64,
    /// `None` when the stats endpoint could not be read
    pub visits: Option<VisitStats>,
}

/// Loads a [`DashboardSummary`]
pub struct Dashboard {
    profile: ProfileClient,
    education: ResourceClient<Education>,
    experience: ResourceClient<Experience>,
    projects: ResourceClient<Project>,
    skills: ResourceClient<Skill>,
    visitor: VisitorClient,
}

async fn total<R: Resource>(client: &ResourceClient<R>) -> Result<u64, Error> {
    Ok(client.list(1, 1).await?.total())
}

impl Dashboard {
    pub fn new(
        profile: ProfileClient,
        education: ResourceClient<Education>,
        experience: ResourceClient<Experience>,
        projects: ResourceClient<Project>,
        skills: ResourceClient<Skill>,
        visitor: VisitorClient,
    ) -> Self {
        Self {
            profile,
            education,
            experience,
            projects,
            skills,
            visitor,
        }
    }

    /// Fetch every total concurrently. Any failing content call fails the
    /// whole load; visit stats are optional.
    pub async fn load(&self) -> Result<DashboardSummary, Error> {
        let (profile, education, experience, projects, skills) = tokio::try_join!(
            self.profile.get(),
            total(&self.education),
            total(&self.experience),
            total(&self.projects),
            total(&self.skills),
        )?;

        let visits = match self.visitor.stats().await {
            Ok(stats) => Some(stats),
            Err(err) => {
                warn!("Visit stats unavailable: {}", err);
                None
            }
        };

        Ok(DashboardSummary {
            profile,
            education,
            experience,
            projects,
            skills,
            visits,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{MemorySessionStore, SharedSessionStore};
    use crate::config::ClientOptions;
    use reqwest::Client;
    use serde_json::json;
    use std::sync::Arc;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn page(total: u64) -> serde_json::Value {
        json!({"data": [], "pagination": {"total": total, "page": 1, "limit": 1, "pages": total}})
    }

    fn dashboard(server: &MockServer) -> Dashboard {
        let url = server.uri();
        let client = Client::new();
        let store: SharedSessionStore = Arc::new(MemorySessionStore::new());
        let options = ClientOptions::default();
        Dashboard::new(
            ProfileClient::new(&url, client.clone(), store.clone(), options.clone()),
            ResourceClient::new(&url, client.clone(), store.clone(), options.clone()),
            ResourceClient::new(&url, client.clone(), store.clone(), options.clone()),
            ResourceClient::new(&url, client.clone(), store.clone(), options.clone()),
            ResourceClient::new(&url, client.clone(), store.clone(), options.clone()),
            VisitorClient::new(&url, client, store, options),
        )
    }

    async fn mount_content(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/profile"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "Jane Doe"})))
            .mount(server)
            .await;
        for (p, total) in [("/education", 2), ("/experience", 3), ("/projects", 5), ("/skills", 8)] {
            Mock::given(method("GET"))
                .and(path(p))
                .respond_with(ResponseTemplate::new(200).set_body_json(page(total)))
                .mount(server)
                .await;
        }
    }

    #[tokio::test]
    async fn collects_totals() {
        let server = MockServer::start().await;
        mount_content(&server).await;
        Mock::given(method("GET"))
            .and(path("/visitor/stats"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "totalVisits": 157,
                "uniqueVisitors": 42
            })))
            .mount(&server)
            .await;

        let summary = dashboard(&server).load().await.unwrap();
        assert_eq!(summary.profile.name, "Jane Doe");
        assert_eq!(
            (summary.education, summary.experience, summary.projects, summary.skills),
            (2, 3, 5, 8)
        );
        assert_eq!(summary.visits.map(|v| v.total_visits), Some(157));
    }

    #[tokio::test]
    async fn missing_stats_are_tolerated() {
        let server = MockServer::start().await;
        mount_content(&server).await;
        Mock::given(method("GET"))
            .and(path("/visitor/stats"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let summary = dashboard(&server).load().await.unwrap();
        assert!(summary.visits.is_none());
    }
}
