use std::process::ExitCode;

use hypr_config_sync::{
    BufferedView, InputKind, MessageSection, Panel, RefreshOutcome, RemoteState, SyncController,
};

use crate::cli::Submission;

pub async fn submit(
    submission: Submission,
    controller: &SyncController,
    refresh: bool,
) -> anyhow::Result<ExitCode> {
    let Submission {
        section,
        form,
        route,
    } = submission;

    let outcome = controller.submit_form(section, &form, route).await;
    if !outcome.is_submitted() {
        return Ok(ExitCode::FAILURE);
    }

    if refresh {
        let RefreshOutcome::Fetched(ticket, state) = controller.refresh().await else {
            return Ok(ExitCode::FAILURE);
        };
        let mut view = BufferedView::default();
        controller.apply_refresh(ticket, &state, &mut view);

        println!("personality: {}", view.personality.text());
        println!("live chats:  {}", join_or_dash(view.streams.items()));
    }

    Ok(ExitCode::SUCCESS)
}

pub async fn show_state(controller: &SyncController, json: bool) -> anyhow::Result<ExitCode> {
    let RefreshOutcome::Fetched(_, state) = controller.refresh().await else {
        return Ok(ExitCode::FAILURE);
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&state)?);
    } else {
        print!("{}", summarize(&state));
    }
    Ok(ExitCode::SUCCESS)
}

pub fn list_panels() {
    for (idx, panel) in Panel::all().iter().enumerate() {
        println!("{} {} [{}]", idx + 1, panel.title(), panel.section());
        for spec in panel.inputs() {
            let kind = match spec.kind {
                InputKind::Text => "text",
                InputKind::Number => "number",
                InputKind::Checkbox => "checkbox",
            };
            println!("    {:<16} {:<9} {}", spec.id, kind, spec.label);
        }
    }
}

fn summarize(state: &RemoteState) -> String {
    let bot = match state.bot {
        Some(bot) if bot.online => "online",
        Some(_) => "offline",
        None => "unknown",
    };

    let channels: Vec<String> = state
        .yt_channels
        .iter()
        .flatten()
        .map(|(id, flags)| {
            let kinds: Vec<&str> = [
                (flags.live, "live"),
                (flags.videos, "videos"),
                (flags.shorts, "shorts"),
            ]
            .into_iter()
            .filter_map(|(on, name)| on.then_some(name))
            .collect();
            format!("{id} ({})", join_or_dash(&kinds))
        })
        .collect();
    let streams: Vec<&str> = state.stream_ids().collect();

    let mut out = String::new();
    out.push_str(&format!("personality: {}\n", state.personality));
    out.push_str(&format!("bot:         {bot}\n"));
    out.push_str(&format!("welcome:     {}\n", describe_message(state.welcome.as_ref())));
    out.push_str(&format!("leave:       {}\n", describe_message(state.leave.as_ref())));
    let level = match &state.level {
        Some(level) if level.enabled => format!(
            "{} xp/message in {}",
            level.xp_per_message, level.channel_id
        ),
        Some(_) => "disabled".to_string(),
        None => "not configured".to_string(),
    };
    out.push_str(&format!("level:       {level}\n"));
    out.push_str(&format!("youtube:     {}\n", join_or_dash(&channels)));
    out.push_str(&format!("live chats:  {}\n", join_or_dash(&streams)));
    out
}

fn describe_message(section: Option<&MessageSection>) -> String {
    match section {
        Some(section) if section.enabled => format!("in {}: {}", section.channel_id, section.message),
        Some(_) => "disabled".to_string(),
        None => "not configured".to_string(),
    }
}

fn join_or_dash<S: AsRef<str>>(items: &[S]) -> String {
    if items.is_empty() {
        return "-".to_string();
    }
    items
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_of_sparse_state() {
        let state: RemoteState = serde_json::from_value(serde_json::json!({
            "personality": "Friendly",
            "streams": { "abc123": {} }
        }))
        .unwrap();

        let summary = summarize(&state);
        assert!(summary.contains("personality: Friendly\n"));
        assert!(summary.contains("bot:         unknown\n"));
        assert!(summary.contains("welcome:     not configured\n"));
        assert!(summary.contains("youtube:     -\n"));
        assert!(summary.contains("live chats:  abc123\n"));
    }

    #[test]
    fn summary_of_full_state() {
        let state: RemoteState = serde_json::from_value(serde_json::json!({
            "personality": "Grumpy",
            "bot": { "online": true },
            "welcome": { "enabled": true, "channel_id": "42", "message": "hi {user}" },
            "leave": { "enabled": false, "channel_id": "42", "message": "bye" },
            "level": { "enabled": true, "channel_id": "7", "xp_per_message": 15, "message": "gg" },
            "yt_channels": { "UC123": { "live": true, "videos": false, "shorts": true } }
        }))
        .unwrap();

        let summary = summarize(&state);
        assert!(summary.contains("bot:         online\n"));
        assert!(summary.contains("welcome:     in 42: hi {user}\n"));
        assert!(summary.contains("leave:       disabled\n"));
        assert!(summary.contains("level:       15 xp/message in 7\n"));
        assert!(summary.contains("youtube:     UC123 (live, shorts)\n"));
        assert!(summary.contains("live chats:  -\n"));
    }
}
