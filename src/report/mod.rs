use crate::{
    config::Subscription,
    context::RunContext,
    error::{Error, Result},
    gitlab::filter::MergeRequestFilter,
    pull_request::{self, PullRequest},
    template::Renderer,
};
use std::collections::{HashMap, HashSet};

/// Lists a project's pull requests.
pub trait PullRequestSource {
    async fn list_pull_requests(
        &self,
        ctx: &RunContext,
        project_id: &str,
        filter: &MergeRequestFilter,
    ) -> Result<Vec<PullRequest>>;
}

/// Delivers rendered text to a named channel.
pub trait Notifier {
    async fn notify(&self, ctx: &RunContext, channel: &str, content: &str) -> Result<()>;
}

/// Outcome of one run, per project and per channel.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReportSummary {
    pub fetched_projects: Vec<String>,
    pub failed_projects: Vec<String>,
    pub delivered_channels: Vec<String>,
    pub failed_channels: Vec<String>,
    pub skipped_channels: Vec<String>,
}

type FetchCache = HashMap<String, Vec<PullRequest>>;

/// Sends every subscribed channel a digest of its projects' unattended pull
/// requests.
///
/// A run fetches each distinct project once, even when several channels
/// watch it, so all channels see the same snapshot. Failures are logged and
/// confined to the project or channel they happened on.
pub struct Report<S, N> {
    source: S,
    notifier: N,
    renderer: Renderer,
    subscriptions: Vec<Subscription>,
}

impl<S, N> Report<S, N>
where
    S: PullRequestSource,
    N: Notifier,
{
    pub fn new(
        source: S,
        notifier: N,
        template: &str,
        subscriptions: Vec<Subscription>,
    ) -> Result<Self> {
        let renderer = Renderer::new(template)
            .map_err(|err| Error::config(format!("cannot compile report template: {}", err)))?;

        Ok(Report {
            source,
            notifier,
            renderer,
            subscriptions,
        })
    }

    pub async fn run(&self, ctx: &RunContext) -> ReportSummary {
        let mut summary = ReportSummary::default();

        let cache = self.fetch(ctx, &mut summary).await;
        self.dispatch(ctx, &cache, &mut summary).await;

        summary
    }

    async fn fetch(&self, ctx: &RunContext, summary: &mut ReportSummary) -> FetchCache {
        let filter = MergeRequestFilter::unattended();
        let mut attempted = HashSet::new();
        let mut cache = FetchCache::new();

        let project_ids = self
            .subscriptions
            .iter()
            .flat_map(|subscription| subscription.projects.iter());

        for project_id in project_ids {
            if !attempted.insert(project_id.as_str()) {
                continue;
            }
            if ctx.is_done() {
                log::warn!("run cancelled, not fetching project {}", project_id);
                continue;
            }

            match self
                .source
                .list_pull_requests(ctx, project_id, &filter)
                .await
            {
                Ok(pull_requests) => {
                    log::info!(
                        "fetched {} pull requests for project {}",
                        pull_requests.len(),
                        project_id
                    );
                    summary.fetched_projects.push(project_id.to_owned());
                    cache.insert(project_id.to_owned(), pull_requests);
                }
                Err(err) => {
                    log::error!(
                        "cannot list pull requests for project {}: {}",
                        project_id,
                        err
                    );
                    summary.failed_projects.push(project_id.to_owned());
                }
            }
        }

        cache
    }

    async fn dispatch(&self, ctx: &RunContext, cache: &FetchCache, summary: &mut ReportSummary) {
        for subscription in &self.subscriptions {
            let channel = &subscription.channel;

            if ctx.is_done() {
                log::warn!("run cancelled, skipping channel {}", channel);
                summary.skipped_channels.push(channel.to_owned());
                continue;
            }

            let content = match self.digest(subscription, cache) {
                Ok(content) => content,
                Err(err) => {
                    log::error!("cannot render digest for channel {}: {}", channel, err);
                    summary.failed_channels.push(channel.to_owned());
                    continue;
                }
            };

            match self.notifier.notify(ctx, channel, &content).await {
                Ok(()) => {
                    log::info!("sent digest to channel {}", channel);
                    summary.delivered_channels.push(channel.to_owned());
                }
                Err(err) => {
                    log::error!("cannot notify channel {}: {}", channel, err);
                    summary.failed_channels.push(channel.to_owned());
                }
            }
        }
    }

    fn digest(&self, subscription: &Subscription, cache: &FetchCache) -> Result<String> {
        let mut pull_requests = Vec::new();

        for project_id in &subscription.projects {
            match cache.get(project_id) {
                Some(fetched) => pull_requests.extend_from_slice(fetched),
                None => log::warn!(
                    "missing pull requests for project {} in channel {}, skipping",
                    project_id,
                    subscription.channel
                ),
            }
        }

        pull_request::sort_by_created_at(&mut pull_requests);

        self.renderer.render(&pull_requests)
    }
}
