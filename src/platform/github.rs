//! GitHub platform service implementation

use crate::error::{Error, Result};
use crate::platform::PlatformService;
use crate::types::{Branch, Issue, IssueComment, PlatformConfig, PrState, PullRequest};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use octocrab::Octocrab;
use octocrab::params::repos::Reference;
use serde::Deserialize;
use tracing::debug;

const PER_PAGE: u8 = 100;

// GraphQL response types for the draft conversion mutation

#[derive(Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConvertToDraftData {
    convert_pull_request_to_draft: ConvertToDraftPayload,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConvertToDraftPayload {
    pull_request: GraphQlPullRequest,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GraphQlPullRequest {
    number: u64,
    id: String,
    is_draft: bool,
    head_ref_name: String,
    updated_at: Option<DateTime<Utc>>,
}

// REST response types for commit lookup

#[derive(Deserialize)]
struct CommitResponse {
    commit: CommitDetail,
}

#[derive(Deserialize)]
struct CommitDetail {
    author: Option<CommitSignature>,
    committer: Option<CommitSignature>,
}

#[derive(Deserialize)]
struct CommitSignature {
    date: Option<DateTime<Utc>>,
}

/// GitHub service using octocrab
pub struct GitHubService {
    client: Octocrab,
    config: PlatformConfig,
}

impl GitHubService {
    /// Create a new GitHub service
    pub fn new(token: &str, owner: String, repo: String, host: Option<String>) -> Result<Self> {
        let mut builder = Octocrab::builder().personal_token(token.to_string());

        if let Some(ref h) = host {
            let base_url = format!("https://{h}/api/v3");
            builder = builder
                .base_uri(&base_url)
                .map_err(|e| Error::GitHubApi(e.to_string()))?;
        }

        let client = builder
            .build()
            .map_err(|e| Error::GitHubApi(e.to_string()))?;

        Ok(Self {
            client,
            config: PlatformConfig {
                owner,
                repo,
                host,
            },
        })
    }

    /// Login of the authenticated user (used to verify credentials)
    pub async fn current_user(&self) -> Result<String> {
        let user = self.client.current().user().await?;
        Ok(user.login)
    }

    async fn node_id_for(&self, pr: &PullRequest) -> Result<String> {
        if let Some(ref id) = pr.node_id {
            return Ok(id.clone());
        }
        let fetched = self
            .client
            .pulls(&self.config.owner, &self.config.repo)
            .get(pr.number)
            .await?;
        fetched.node_id.ok_or_else(|| {
            Error::GitHubApi("PR missing node_id for GraphQL mutation".to_string())
        })
    }
}

/// Helper to convert octocrab PR to our `PullRequest` type
fn pr_from_octocrab(pr: &octocrab::models::pulls::PullRequest) -> PullRequest {
    let state = match pr.state {
        Some(octocrab::models::IssueState::Open) => PrState::Open,
        // IssueState is non-exhaustive, so use wildcard for Closed and any future variants
        Some(_) | None => PrState::Closed,
    };

    PullRequest {
        number: pr.number,
        state,
        is_draft: pr.draft.unwrap_or(false),
        head_ref: pr.head.ref_field.clone(),
        updated_at: pr.updated_at,
        labels: pr
            .labels
            .as_ref()
            .map(|labels| labels.iter().map(|l| l.name.clone()).collect())
            .unwrap_or_default(),
        node_id: pr.node_id.clone(),
    }
}

fn comment_from_octocrab(comment: octocrab::models::issues::Comment) -> IssueComment {
    IssueComment {
        author: comment.user.login,
        body: comment.body.unwrap_or_default(),
        created_at: comment.created_at,
    }
}

#[async_trait]
impl PlatformService for GitHubService {
    async fn default_branch(&self) -> Result<String> {
        debug!(repo = %self.config.slug(), "resolving default branch");
        let repo = self
            .client
            .repos(&self.config.owner, &self.config.repo)
            .get()
            .await?;

        repo.default_branch
            .ok_or_else(|| Error::GitHubApi("repository has no default branch".to_string()))
    }

    async fn list_branches(&self) -> Result<Vec<Branch>> {
        debug!(repo = %self.config.slug(), "listing branches");
        let first_page = self
            .client
            .repos(&self.config.owner, &self.config.repo)
            .list_branches()
            .per_page(PER_PAGE)
            .send()
            .await?;

        let branches: Vec<Branch> = self
            .client
            .all_pages(first_page)
            .await?
            .into_iter()
            .map(|b| Branch {
                name: b.name,
                commit_sha: b.commit.sha,
                // The listing endpoint only carries the SHA
                committed_at: None,
            })
            .collect();

        debug!(count = branches.len(), "listed branches");
        Ok(branches)
    }

    async fn commit_date(&self, sha: &str) -> Result<Option<DateTime<Utc>>> {
        debug!(sha, "looking up commit");
        let route = format!(
            "/repos/{}/{}/commits/{}",
            self.config.owner, self.config.repo, sha
        );
        let response: CommitResponse = self.client.get(route, None::<&()>).await?;

        let author_date = response.commit.author.and_then(|a| a.date);
        let committer_date = response.commit.committer.and_then(|c| c.date);
        Ok(author_date.or(committer_date))
    }

    async fn list_prs_for_branch(&self, head_branch: &str) -> Result<Vec<PullRequest>> {
        debug!(head_branch, "listing PRs for branch");
        let head = format!("{}:{}", &self.config.owner, head_branch);

        let first_page = self
            .client
            .pulls(&self.config.owner, &self.config.repo)
            .list()
            .head(head)
            .state(octocrab::params::State::All)
            .per_page(PER_PAGE)
            .send()
            .await?;

        let prs: Vec<PullRequest> = self
            .client
            .all_pages(first_page)
            .await?
            .iter()
            .map(pr_from_octocrab)
            .collect();

        debug!(head_branch, count = prs.len(), "listed PRs");
        Ok(prs)
    }

    async fn convert_pr_to_draft(&self, pr: &PullRequest) -> Result<PullRequest> {
        debug!(pr_number = pr.number, "converting PR to draft");
        let node_id = self.node_id_for(pr).await?;

        let response: GraphQlResponse<ConvertToDraftData> = self
            .client
            .graphql(&serde_json::json!({
                "query": r"
                    mutation ConvertPullRequestToDraft($pullRequestId: ID!) {
                        convertPullRequestToDraft(input: { pullRequestId: $pullRequestId }) {
                            pullRequest {
                                number
                                id
                                isDraft
                                headRefName
                                updatedAt
                            }
                        }
                    }
                ",
                "variables": {
                    "pullRequestId": node_id
                }
            }))
            .await
            .map_err(|e| Error::GitHubApi(format!("GraphQL mutation failed: {e}")))?;

        if let Some(errors) = response.errors
            && !errors.is_empty()
        {
            let messages: Vec<_> = errors.into_iter().map(|e| e.message).collect();
            return Err(Error::GitHubApi(format!(
                "GraphQL error: {}",
                messages.join(", ")
            )));
        }

        let data = response
            .data
            .ok_or_else(|| Error::GitHubApi("No data in GraphQL response".to_string()))?;
        let updated = data.convert_pull_request_to_draft.pull_request;

        debug!(pr_number = updated.number, is_draft = updated.is_draft, "draft mutation done");
        Ok(PullRequest {
            number: updated.number,
            state: pr.state,
            is_draft: updated.is_draft,
            head_ref: updated.head_ref_name,
            updated_at: updated.updated_at.or(pr.updated_at),
            labels: pr.labels.clone(),
            node_id: Some(updated.id),
        })
    }

    async fn close_pr(&self, pr_number: u64) -> Result<PullRequest> {
        debug!(pr_number, "closing PR");
        let pr = self
            .client
            .pulls(&self.config.owner, &self.config.repo)
            .update(pr_number)
            .state(octocrab::params::pulls::State::Closed)
            .send()
            .await?;

        debug!(pr_number, "closed PR");
        Ok(pr_from_octocrab(&pr))
    }

    async fn list_issue_comments(&self, issue_number: u64) -> Result<Vec<IssueComment>> {
        debug!(issue_number, "listing comments");
        let first_page = self
            .client
            .issues(&self.config.owner, &self.config.repo)
            .list_comments(issue_number)
            .per_page(PER_PAGE)
            .send()
            .await?;

        let comments: Vec<IssueComment> = self
            .client
            .all_pages(first_page)
            .await?
            .into_iter()
            .map(comment_from_octocrab)
            .collect();

        debug!(issue_number, count = comments.len(), "listed comments");
        Ok(comments)
    }

    async fn create_issue(&self, title: &str, body: &str) -> Result<Issue> {
        debug!(title, "creating issue");
        let issue = self
            .client
            .issues(&self.config.owner, &self.config.repo)
            .create(title)
            .body(body)
            .send()
            .await?;

        debug!(issue_number = issue.number, "created issue");
        Ok(Issue {
            number: issue.number,
            html_url: issue.html_url.to_string(),
        })
    }

    async fn create_issue_comment(&self, issue_number: u64, body: &str) -> Result<()> {
        debug!(issue_number, "creating comment");
        self.client
            .issues(&self.config.owner, &self.config.repo)
            .create_comment(issue_number, body)
            .await?;
        debug!(issue_number, "created comment");
        Ok(())
    }

    async fn delete_branch(&self, branch: &str) -> Result<()> {
        debug!(branch, "deleting branch ref");
        self.client
            .repos(&self.config.owner, &self.config.repo)
            .delete_ref(&Reference::Branch(branch.to_string()))
            .await?;
        debug!(branch, "deleted branch ref");
        Ok(())
    }

    fn config(&self) -> &PlatformConfig {
        &self.config
    }
}
