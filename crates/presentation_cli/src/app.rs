//! Wiring of configuration, stores and services behind the CLI commands

use std::{path::PathBuf, sync::Arc};

use anyhow::Context;
use application::{
    BatchApprovalService, MeetingCapacityAllocator, ReviewService, TransitionNotification,
};
use domain::{ItemId, MeetingId, ReviewCommand};
use infrastructure::{AppConfig, SqliteMeetingStore, SqliteReviewItemStore, StateDb};
use serde::Serialize;
use tracing::{debug, info};

use crate::{
    cli::{BatchAction, Cli, Commands, RoutingArgs},
    output,
};

/// Load configuration for `cli` and run its command, returning what to print
pub async fn execute(cli: Cli) -> anyhow::Result<String> {
    let config = load_config(&cli)?;

    if matches!(cli.command, Commands::Config) {
        return Ok(config.to_toml()?);
    }

    let app = App::open(config, cli.actor, cli.json).await?;
    let rendered = app.run(cli.command).await;
    app.close().await;
    rendered
}

/// Configuration with command-line overrides applied
pub fn load_config(cli: &Cli) -> anyhow::Result<AppConfig> {
    let mut config = AppConfig::load_from(cli.config.as_deref())
        .context("Failed to load configuration")?;
    if let Some(path) = &cli.database {
        config.database.path = path.display().to_string();
    }
    Ok(config)
}

/// Services over an open state file
pub struct App {
    config: AppConfig,
    db: StateDb,
    meetings: Arc<SqliteMeetingStore>,
    reviews: Arc<ReviewService>,
    batch: BatchApprovalService,
    actor: String,
    json: bool,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("database", &self.config.database.path)
            .field("actor", &self.actor)
            .field("json", &self.json)
            .finish_non_exhaustive()
    }
}

impl App {
    /// Open the state file and build the workflow services
    pub async fn open(config: AppConfig, actor: Option<String>, json: bool) -> anyhow::Result<Self> {
        let db = StateDb::new(&config.database.connection())
            .await
            .with_context(|| format!("Failed to open {}", config.database.path))?;
        if config.database.run_migrations {
            db.migrate().await.context("Failed to run migrations")?;
        }

        let meetings = Arc::new(SqliteMeetingStore::new(db.pool().clone()));
        let items = Arc::new(SqliteReviewItemStore::new(db.pool().clone()));

        let allocator = Arc::new(
            MeetingCapacityAllocator::new(meetings.clone(), config.review.capacity_policy)
                .with_max_retries(config.review.reservation_retries),
        );
        let reviews = Arc::new(ReviewService::new(items, allocator));
        reviews.subscribe(Arc::new(|notification: &TransitionNotification| {
            debug!(
                item_id = %notification.item_id,
                status = %notification.status,
                hide_active_panel = notification.hide_active_panel,
                "Review transition"
            );
        }));

        let actor = actor.unwrap_or_else(|| config.review.default_actor.clone());

        Ok(Self {
            batch: BatchApprovalService::new(reviews.clone()),
            config,
            db,
            meetings,
            reviews,
            actor,
            json,
        })
    }

    /// Release the connection pool
    pub async fn close(&self) {
        self.db.close().await;
    }

    /// Run a single command
    pub async fn run(&self, command: Commands) -> anyhow::Result<String> {
        match command {
            Commands::Init => self.init().await,
            Commands::Config => Ok(self.config.to_toml()?),
            Commands::Register { title, kind } => {
                let item = self.reviews.register(kind, &title, &self.actor).await?;
                self.render(&item, || format!("Registered {}\n", output::item_line(&item)))
            },
            Commands::List { status } => {
                let items = self.reviews.list(status).await?;
                self.render(&items, || {
                    if items.is_empty() {
                        return "No items\n".to_string();
                    }
                    items
                        .iter()
                        .map(|item| output::item_line(item) + "\n")
                        .collect()
                })
            },
            Commands::Meetings => {
                let allocator = self.reviews.allocator();
                let slots = allocator.slots().await?;
                let default = allocator.select_default().await?;
                self.render(&slots, || output::meetings(&slots, default))
            },
            Commands::SelectMeeting => {
                let default = self.reviews.allocator().select_default().await?;
                self.render(&default, || match default {
                    Some(id) => format!("{id}\n"),
                    None => "No meetings configured\n".to_string(),
                })
            },
            Commands::Show { item } => self.show(&item).await,
            Commands::Approve { item, routing } => {
                let meeting = self.resolve_meeting(&routing).await?;
                let outcome = self
                    .reviews
                    .approve(
                        &item,
                        &self.actor,
                        routing.method,
                        meeting,
                        routing.comment.as_deref(),
                    )
                    .await?;
                self.render(&outcome.notification, || output::transition(&outcome))
            },
            Commands::Reject { item, comment } => {
                let outcome = self.reviews.reject(&item, &self.actor, &comment).await?;
                self.render(&outcome.notification, || output::transition(&outcome))
            },
            Commands::RequestRevision { item, comment } => {
                let outcome = self
                    .reviews
                    .request_revision(&item, &self.actor, &comment)
                    .await?;
                self.render(&outcome.notification, || output::transition(&outcome))
            },
            Commands::Resubmit { item, comment } => {
                let item = self.reviews.resubmit(&item, &self.actor, &comment).await?;
                self.render(&item, || {
                    format!("{} reopened for cycle {}\n", item.title(), item.cycle())
                })
            },
            Commands::Batch(action) => self.batch(action).await,
            Commands::History { item } => {
                let records = self.reviews.history(&item).await?;
                self.render(&records, || output::history(&records))
            },
        }
    }

    async fn init(&self) -> anyhow::Result<String> {
        let meetings = self.config.meetings()?;
        let added = self.meetings.provision(&meetings).await?;
        info!(added, configured = meetings.len(), "Meetings provisioned");

        let path = PathBuf::from(&self.config.database.path);
        self.render(&serde_json::json!({ "provisioned": added }), || {
            format!(
                "Initialized {} ({added} of {} meetings added)\n",
                path.display(),
                meetings.len()
            )
        })
    }

    async fn show(&self, id: &ItemId) -> anyhow::Result<String> {
        let item = self.reviews.get(id).await?;
        if !item.is_pending() {
            return self.render(&item, || output::item_detail(&item));
        }

        let prompt = self.reviews.open_approval(id).await?;
        self.render(&prompt, || output::prompt(&prompt))
    }

    async fn batch(&self, action: BatchAction) -> anyhow::Result<String> {
        let (command, items) = match action {
            BatchAction::Approve { routing, items } => {
                let meeting_id = self.resolve_meeting(&routing).await?;
                let command = ReviewCommand::Approve {
                    method: routing.method,
                    meeting_id,
                    comment: routing.comment,
                };
                (command, items)
            },
            BatchAction::Reject { comment, items } => (ReviewCommand::reject(comment), items),
            BatchAction::RequestRevision { comment, items } => {
                (ReviewCommand::request_revision(comment), items)
            },
        };

        let outcome = self
            .batch
            .apply_to_selection(&items, &self.actor, &command)
            .await;
        self.render(&outcome, || output::batch(&outcome))
    }

    /// Explicit meeting, or the default one when asked for
    async fn resolve_meeting(&self, routing: &RoutingArgs) -> anyhow::Result<Option<MeetingId>> {
        if routing.default_meeting {
            return Ok(self.reviews.allocator().select_default().await?);
        }
        Ok(routing.meeting)
    }

    fn render<T: Serialize>(
        &self,
        value: &T,
        text: impl FnOnce() -> String,
    ) -> anyhow::Result<String> {
        if self.json {
            let mut rendered = serde_json::to_string_pretty(value)?;
            rendered.push('\n');
            return Ok(rendered);
        }
        Ok(text())
    }
}
