use git_context_engine::PullRequestRef;
use pr_reviewer::PullRequestEvent;
use serde::Deserialize;

/// GitHub `pull_request` webhook payload, reduced to the fields the review
/// flow reads. Everything is optional so foreign events still parse and can
/// be ignored.
#[derive(Debug, Default, Deserialize)]
pub struct PullRequestWebhook {
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub pull_request: Option<PullRequestPayload>,
    #[serde(default)]
    pub repository: Option<RepositoryPayload>,
    #[serde(default)]
    pub installation: Option<InstallationPayload>,
}

#[derive(Debug, Deserialize)]
pub struct PullRequestPayload {
    #[serde(default)]
    pub number: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct RepositoryPayload {
    pub name: String,
    pub owner: OwnerPayload,
}

#[derive(Debug, Deserialize)]
pub struct OwnerPayload {
    pub login: String,
}

#[derive(Debug, Deserialize)]
pub struct InstallationPayload {
    pub id: u64,
}

impl PullRequestWebhook {
    /// A pull request without a number or without a repository is not
    /// reviewable and becomes `pull_request: None`.
    pub fn into_event(self) -> PullRequestEvent {
        let installation_id = self.installation.map(|i| i.id);
        let pull_request = match (self.pull_request.and_then(|p| p.number), self.repository) {
            (Some(pr_number), Some(repo)) => Some(PullRequestRef {
                owner: repo.owner.login,
                repo_name: repo.name,
                pr_number,
                installation_id,
            }),
            _ => None,
        };

        PullRequestEvent {
            action: self.action.unwrap_or_default(),
            pull_request,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_payload_maps_to_event() {
        let payload: PullRequestWebhook = serde_json::from_str(
            r#"{
                "action": "opened",
                "number": 12,
                "pull_request": {"number": 12, "title": "Add cache"},
                "repository": {"name": "demo", "owner": {"login": "octo"}},
                "installation": {"id": 4242}
            }"#,
        )
        .unwrap();

        assert_eq!(
            payload.into_event(),
            PullRequestEvent {
                action: "opened".into(),
                pull_request: Some(PullRequestRef {
                    owner: "octo".into(),
                    repo_name: "demo".into(),
                    pr_number: 12,
                    installation_id: Some(4242),
                }),
            }
        );
    }

    #[test]
    fn pull_request_without_repository_is_not_reviewable() {
        let payload: PullRequestWebhook =
            serde_json::from_str(r#"{"action":"opened","pull_request":{"number":1}}"#).unwrap();
        let event = payload.into_event();
        assert_eq!(event.action, "opened");
        assert!(event.pull_request.is_none());
    }

    #[test]
    fn ping_event_parses_as_empty() {
        let payload: PullRequestWebhook =
            serde_json::from_str(r#"{"zen":"Keep it logically awesome.","hook_id":1}"#).unwrap();
        let event = payload.into_event();
        assert!(event.action.is_empty());
        assert!(event.pull_request.is_none());
    }
}
