use habittree_core::{Database, Event, HabitSnapshot, HabitTracker, TreeLayout};
use tracing::debug;

use super::Context;

type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Open the tracker and run load-time decay, as every front end does on start.
fn open_loaded(ctx: &Context, json: bool) -> Result<HabitTracker<Database>, Box<dyn std::error::Error>> {
    let mut tracker = ctx.tracker()?;
    let event = tracker.load(ctx.today)?;
    debug!(?event, "state loaded");
    if let Event::DecayApplied {
        days_missed,
        leaves_before,
        leaves_after,
        ..
    } = event
    {
        if !json && leaves_before != leaves_after {
            println!(
                "{days_missed} missed day(s): the tree lost {} leaf/leaves",
                leaves_before - leaves_after
            );
        }
    }
    Ok(tracker)
}

fn print_snapshot(name: &str, snap: &HabitSnapshot) {
    let last = snap
        .last_completed
        .map_or_else(|| "never".to_string(), |d| d.to_string());
    println!("{name}");
    println!("  leaves:  {}", snap.leaves);
    println!("  streak:  {}", snap.streak);
    println!("  last:    {last}");
    println!(
        "  flowers: {} (one every {} leaves)",
        snap.flowers, snap.flower_threshold
    );
    if snap.completed_today {
        println!("  done for {}", snap.today);
    }
}

fn print_event(event: &Event) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(event)?);
    Ok(())
}

pub fn status(ctx: &Context, json: bool) -> CmdResult {
    let tracker = open_loaded(ctx, json)?;
    let snap = tracker.snapshot(ctx.today)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&snap)?);
    } else {
        print_snapshot(&ctx.config()?.habit.name, &snap);
    }
    Ok(())
}

pub fn complete(ctx: &Context, json: bool) -> CmdResult {
    let mut tracker = open_loaded(ctx, json)?;
    let event = tracker.complete(ctx.today)?;
    if json {
        return print_event(&event);
    }
    match event {
        Event::HabitCompleted { leaves, streak, at } => {
            println!("{at}: a new leaf grew (leaves: {leaves}, streak: {streak})");
        }
        Event::AlreadyCompleted { at } => println!("already completed for {at}"),
        other => print_event(&other)?,
    }
    Ok(())
}

pub fn undo(ctx: &Context, json: bool) -> CmdResult {
    let mut tracker = open_loaded(ctx, json)?;
    let event = tracker.undo()?;
    if json {
        return print_event(&event);
    }
    if let Event::CompletionUndone {
        removed,
        leaves,
        last_completed,
    } = event
    {
        let last = last_completed.map_or_else(|| "never".to_string(), |d| d.to_string());
        println!("undid {removed} (leaves: {leaves}, last: {last})");
    }
    Ok(())
}

pub fn threshold(ctx: &Context, value: Option<String>) -> CmdResult {
    let mut tracker = ctx.tracker()?;
    match value {
        Some(input) => {
            if let Event::FlowerThresholdChanged {
                flower_threshold,
                flowers,
            } = tracker.set_flower_threshold(&input)?
            {
                println!("flower threshold: {flower_threshold} (flowers: {flowers})");
            }
        }
        None => println!("{}", tracker.state()?.flower_threshold),
    }
    Ok(())
}

pub fn history(ctx: &Context, json: bool) -> CmdResult {
    let tracker = ctx.tracker()?;
    let history = tracker.state()?.history;
    if json {
        println!("{}", serde_json::to_string_pretty(&history)?);
    } else if history.is_empty() {
        println!("no completions recorded");
    } else {
        for day in &history {
            println!("{day}");
        }
    }
    Ok(())
}

pub fn layout(ctx: &Context) -> CmdResult {
    let tracker = open_loaded(ctx, true)?;
    let snap = tracker.snapshot(ctx.today)?;
    let layout = TreeLayout::new(snap.leaves, snap.flowers);
    println!("{}", serde_json::to_string_pretty(&layout)?);
    Ok(())
}
