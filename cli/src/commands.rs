//! Subcommands, one per coordinator.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Subcommand, ValueEnum};

use votechain_client::{validation, Attachment, CampaignDraft, ClientError, Registration, WinnerPoller};
use votechain_routes::{guard, landing_page, resolve, Access};
use votechain_types::{Address, CampaignId, RequestedRole, UserDetails};
use votechain_utils::parse_duration;

use crate::app::App;
use crate::render;

#[derive(Subcommand)]
pub enum Command {
    /// Browse and manage campaigns.
    Campaigns {
        #[command(subcommand)]
        action: CampaignAction,
    },
    /// Cast a ballot for a candidate.
    Vote { campaign: u64, candidate: String },
    /// Show or edit the connected account's profile.
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
    /// Ask to be verified as voter or candidate.
    Verify {
        #[command(subcommand)]
        action: VerifyAction,
    },
    /// Admin tasks: review queue and dashboard.
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// Close the campaign the contract reports as due.
    Upkeep,
    /// Poll a campaign until its winner is recorded.
    WatchWinner {
        campaign: u64,
        /// Poll interval, e.g. "10s" (defaults to the configured value).
        #[arg(long)]
        interval: Option<String>,
    },
    /// Check whether the connected session may open a page.
    Route { path: String },
}

#[derive(Subcommand)]
pub enum CampaignAction {
    List {
        /// Only campaigns the connected account takes part in.
        #[arg(long)]
        mine: bool,
    },
    Show { id: u64 },
    Create(CampaignArgs),
    Update {
        id: u64,
        #[command(flatten)]
        args: CampaignArgs,
    },
    Delete { id: u64 },
    Register {
        id: u64,
        #[arg(long = "as", value_enum, default_value_t = Side::Voter)]
        side: Side,
    },
}

#[derive(clap::Args)]
pub struct CampaignArgs {
    #[arg(long)]
    title: String,
    #[arg(long)]
    description: String,
    /// Delay before voting opens, e.g. "2h".
    #[arg(long)]
    starts_in: String,
    /// How long voting stays open, e.g. "3d".
    #[arg(long)]
    duration: String,
    /// Banner image to pin with the description.
    #[arg(long)]
    image: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum ProfileAction {
    Show,
    Update {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, default_value = "")]
        date_of_birth: String,
        #[arg(long)]
        identity_number: String,
        #[arg(long, default_value = "")]
        contact_number: String,
        #[arg(long, default_value = "")]
        bio: String,
        #[arg(long = "link")]
        links: Vec<String>,
        #[arg(long)]
        image: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum VerifyAction {
    Request {
        #[arg(long, value_enum)]
        role: Side,
        /// Identity document to upload.
        document: PathBuf,
    },
    Status,
}

#[derive(Subcommand)]
pub enum AdminAction {
    /// Pending verification requests.
    Requests,
    Approve { requester: String },
    Reject {
        requester: String,
        #[arg(long)]
        feedback: String,
    },
    Dashboard,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum Side {
    Voter,
    Candidate,
}

impl Side {
    fn registration(self) -> Registration {
        match self {
            Self::Voter => Registration::Voter,
            Self::Candidate => Registration::Candidate,
        }
    }

    fn requested_role(self) -> RequestedRole {
        match self {
            Self::Voter => RequestedRole::Voter,
            Self::Candidate => RequestedRole::Candidate,
        }
    }
}

pub async fn execute(app: &App, command: Command) -> anyhow::Result<()> {
    let client = &app.client;
    match command {
        Command::Campaigns { action } => match action {
            CampaignAction::List { mine } => {
                if mine {
                    app.connect().await?;
                } else {
                    app.try_connect().await;
                }
                let campaigns = client.fetch_campaigns().await?;
                let shown = if mine {
                    client.my_campaigns()
                } else {
                    campaigns
                };
                render::campaign_table(&shown, client.now());
            }
            CampaignAction::Show { id } => {
                let id = CampaignId(id);
                app.try_connect().await;
                let campaign = client.fetch_campaign(id).await?;
                let metadata = match client.fetch_campaign_metadata(id).await {
                    Ok(m) => Some(m),
                    Err(e) => {
                        tracing::debug!("no metadata for campaign {id}: {e}");
                        None
                    }
                };
                render::campaign(&campaign, metadata.as_ref(), client.now(), client.has_voted(id));
            }
            CampaignAction::Create(args) => {
                app.connect().await?;
                let created = client.create_campaign(draft(app, args)?).await?;
                println!("campaign {} created in tx {}", created.id, created.tx.tx_hash);
            }
            CampaignAction::Update { id, args } => {
                app.connect().await?;
                let outcome = client.update_campaign(CampaignId(id), draft(app, args)?).await?;
                println!("campaign {id} updated in tx {}", outcome.tx_hash);
            }
            CampaignAction::Delete { id } => {
                app.connect().await?;
                let outcome = client.delete_campaign(CampaignId(id)).await?;
                println!("campaign {id} deleted in tx {}", outcome.tx_hash);
            }
            CampaignAction::Register { id, side } => {
                app.connect().await?;
                client.fetch_campaign(CampaignId(id)).await?;
                let outcome = client
                    .register_for_campaign(CampaignId(id), side.registration())
                    .await?;
                println!("registered in campaign {id}, tx {}", outcome.tx_hash);
            }
        },
        Command::Vote { campaign, candidate } => {
            let candidate = validation::address("candidate", &candidate)?;
            let id = CampaignId(campaign);
            app.connect().await?;
            client.fetch_campaign(id).await?;
            let outcome = client.vote(id, candidate).await?;
            println!("vote for {candidate} recorded in tx {}", outcome.tx_hash);
        }
        Command::Profile { action } => {
            app.connect().await?;
            match action {
                ProfileAction::Show => render::profile(client),
                ProfileAction::Update {
                    name,
                    email,
                    date_of_birth,
                    identity_number,
                    contact_number,
                    bio,
                    links,
                    image,
                } => {
                    let existing = client.read_store(|s| s.user.details.clone());
                    let details = UserDetails {
                        name,
                        email,
                        date_of_birth,
                        identity_number,
                        contact_number,
                        bio,
                        profile_image_hash: existing.and_then(|d| d.profile_image_hash),
                        supportive_links: links,
                    };
                    let image = image.as_deref().map(attachment).transpose()?;
                    let outcome = client.update_profile(details, image).await?;
                    println!("profile saved in tx {}", outcome.tx_hash);
                }
            }
        }
        Command::Verify { action } => {
            app.connect().await?;
            match action {
                VerifyAction::Request { role, document } => {
                    let document = attachment(&document)?;
                    let outcome = client
                        .request_verification(role.requested_role(), &document)
                        .await?;
                    println!("verification requested in tx {}", outcome.tx_hash);
                }
                VerifyAction::Status => render::verification_status(client),
            }
        }
        Command::Admin { action } => {
            app.connect().await?;
            match action {
                AdminAction::Requests => {
                    let requests = client.fetch_pending_verifications().await?;
                    render::requests(&requests);
                }
                AdminAction::Approve { requester } => {
                    let requester = requester_address(&requester)?;
                    let outcome = client.approve_verification(requester).await?;
                    println!("approved {requester} in tx {}", outcome.tx_hash);
                }
                AdminAction::Reject {
                    requester,
                    feedback,
                } => {
                    let requester = requester_address(&requester)?;
                    let outcome = client.reject_verification(requester, &feedback).await?;
                    println!("rejected {requester} in tx {}", outcome.tx_hash);
                }
                AdminAction::Dashboard => {
                    let stats = client.refresh_dashboard().await?;
                    render::dashboard(&stats);
                }
            }
        }
        Command::Upkeep => {
            app.connect().await?;
            match client.run_upkeep().await? {
                Some((id, outcome)) => println!("campaign {id} closed in tx {}", outcome.tx_hash),
                None => println!("no campaign is due for closing"),
            }
        }
        Command::WatchWinner { campaign, interval } => {
            let id = CampaignId(campaign);
            let interval = match interval {
                Some(raw) => std::time::Duration::from_secs(parse_duration(&raw)?),
                None => client.config().winner_poll(),
            };
            if app.try_connect().await.is_some() {
                app.watch_wallet();
            }
            client.fetch_campaign(id).await?;
            let mut poller =
                WinnerPoller::spawn(std::sync::Arc::clone(client), id, interval, app.shutdown.subscribe());
            println!("waiting for the winner of campaign {id} (Ctrl-C to stop)");
            tokio::select! {
                winner = poller.wait() => match winner {
                    Some(w) => println!("campaign {id} won by {w}"),
                    None => println!("stopped without a winner"),
                },
                _ = app.shutdown.wait_for_signal() => println!("stopped"),
            }
        }
        Command::Route { path } => {
            let (route, params) =
                resolve(&path).with_context(|| format!("no page at {path}"))?;
            let account = app.try_connect().await;
            let role = client.current_role();
            match guard(account.as_ref(), role, route) {
                Access::Allow => {
                    println!("allow {}", route.path);
                    for (name, value) in params {
                        println!("  {name} = {value}");
                    }
                }
                Access::Redirect(to) => println!("redirect {path} -> {to}"),
            }
            if let Some(role) = role {
                println!("landing page for {role}: {}", landing_page(role));
            }
        }
    }
    Ok(())
}

fn draft(app: &App, args: CampaignArgs) -> anyhow::Result<CampaignDraft> {
    let now = app.client.now();
    let start = now.plus(parse_duration(&args.starts_in)?);
    let end = start.plus(parse_duration(&args.duration)?);
    let image = args.image.as_deref().map(attachment).transpose()?;
    Ok(CampaignDraft {
        title: args.title,
        description: args.description,
        start,
        end,
        image,
    })
}

fn attachment(path: &Path) -> anyhow::Result<Attachment> {
    let bytes = std::fs::read(path).with_context(|| format!("cannot read {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());
    Ok(Attachment { name, bytes })
}

fn requester_address(raw: &str) -> Result<Address, ClientError> {
    validation::address("requester", raw)
}
