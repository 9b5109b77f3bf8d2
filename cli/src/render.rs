//! Plain-text output.

use votechain_store::{DashboardStats, NotificationLevel};
use votechain_types::{Campaign, CampaignMetadata, CampaignPhase, Timestamp, VerificationRequest};
use votechain_utils::format_duration;

use crate::app::{App, Client};

/// When the campaign changes phase next, relative to `now`.
fn countdown(c: &Campaign, now: Timestamp) -> String {
    match c.phase(now) {
        CampaignPhase::Upcoming => format!("opens in {}", format_duration(c.start.remaining_from(now))),
        CampaignPhase::Active => format!("closes in {}", format_duration(c.end.remaining_from(now))),
        CampaignPhase::Ended => format!("ended {} ago", format_duration(c.end.elapsed_since(now))),
        CampaignPhase::Closed => match c.winner {
            Some(w) => format!("won by {w}"),
            None => "closed without a winner".to_string(),
        },
    }
}

pub fn campaign_table(campaigns: &[Campaign], now: Timestamp) {
    if campaigns.is_empty() {
        println!("no campaigns");
        return;
    }
    println!("{:>5}  {:<14}  {:>6}  {:>5}  STATUS", "ID", "PHASE", "VOTERS", "VOTES");
    for c in campaigns {
        println!(
            "{:>5}  {:<14}  {:>6}  {:>5}  {}",
            c.id.to_string(),
            c.phase(now).as_str(),
            c.voters.len(),
            c.total_votes(),
            countdown(c, now)
        );
    }
}

pub fn campaign(c: &Campaign, metadata: Option<&CampaignMetadata>, now: Timestamp, voted: bool) {
    match metadata {
        Some(m) => {
            println!("#{} {}", c.id, m.title);
            println!("{}", m.description);
        }
        None => println!("#{}", c.id),
    }
    println!("phase:    {} ({})", c.phase(now).as_str(), countdown(c, now));
    println!("length:   {}", format_duration(c.duration_secs()));
    println!("voters:   {}", c.voters.len());
    for candidate in &c.candidates {
        println!("  {candidate}  {:>5} votes", c.votes_for(candidate));
    }
    if voted {
        println!("you have voted in this campaign");
    }
}

pub fn profile(client: &Client) {
    let (account, role, details) = client.read_store(|s| {
        (s.user.account, s.user.effective_role(), s.user.details.clone())
    });
    if let Some(account) = account {
        println!("account:  {account}");
    }
    if let Some(role) = role {
        println!("role:     {role}");
    }
    match details.filter(|d| !d.is_empty()) {
        Some(d) => {
            println!("name:     {}", d.name);
            println!("email:    {}", d.email);
            println!("born:     {}", d.date_of_birth);
            println!("contact:  {}", d.contact_number);
            if !d.bio.is_empty() {
                println!("bio:      {}", d.bio);
            }
            for link in &d.supportive_links {
                println!("link:     {link}");
            }
        }
        None => println!("no profile saved yet"),
    }
}

pub fn verification_status(client: &Client) {
    match client.read_store(|s| s.verification.own_request.clone()) {
        Some(req) => {
            println!("requested {} : {}", req.role, req.status.as_str());
            if !req.admin_feedback.is_empty() {
                println!("feedback: {}", req.admin_feedback);
            }
        }
        None => println!("no verification request"),
    }
}

pub fn requests(requests: &[VerificationRequest]) {
    if requests.is_empty() {
        println!("no pending requests");
    }
    for r in requests {
        println!("{}  {:<9}  {}", r.requester, r.role.to_string(), r.document_hash);
    }
}

pub fn dashboard(stats: &DashboardStats) {
    println!("campaigns:       {}", stats.total_campaigns);
    println!("  upcoming:      {}", stats.upcoming);
    println!("  active:        {}", stats.active);
    println!("  ended:         {}", stats.awaiting_close);
    println!("  closed:        {}", stats.closed);
    println!("votes cast:      {}", stats.total_votes);
    println!("pending reviews: {}", stats.pending_verifications);
}

/// Print what the command queued; errors are left to the exit report.
pub fn flush_notifications(app: &App) {
    let queued = app.client.with_store(|s| s.notifications.drain());
    for n in queued {
        match n.level {
            NotificationLevel::Error => {}
            NotificationLevel::Warning => eprintln!("warning: {}", n.message),
            NotificationLevel::Success | NotificationLevel::Info => println!("{}", n.message),
        }
    }
}
