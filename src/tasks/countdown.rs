//! Countdown background task
//!
//! One long-lived task owns the ticking for whichever run is live. Action
//! handlers only flip state and broadcast; this task reacts, so at most one
//! tick loop exists at any time and every transition out of Running ends it.

use std::sync::Arc;

use tokio::{
    sync::broadcast,
    time::{interval_at, sleep, Instant, MissedTickBehavior},
};
use tracing::{debug, error, info, warn};

use crate::{
    state::{
        presets::{NOTIFICATION_AUTO_HIDE, TICK_INTERVAL},
        AppState, TickOutcome, TimerPhase, TimerState,
    },
    utils::format_time,
};

/// Background task that drives the countdown for the lifetime of the process
pub async fn countdown_task(state: Arc<AppState>) {
    info!("Starting countdown task");

    let mut events = state.timer_event_tx.subscribe();

    loop {
        // Enter the tick loop whenever a run is live, whether we learned of it
        // from an event or it predates our subscription
        match state.current_timer() {
            Ok(timer) if timer.phase == TimerPhase::Running => {
                run_countdown(&state, timer.run_id, &mut events).await;
                continue;
            }
            Ok(_) => {}
            Err(e) => error!("Failed to read timer state: {}", e),
        }

        match events.recv().await {
            Ok(_) => {}
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!("Countdown task lagged {} timer events", skipped);
            }
            Err(broadcast::error::RecvError::Closed) => {
                debug!("Timer event channel closed, stopping countdown task");
                break;
            }
        }
    }
}

/// Tick once per second until the run completes or is superseded
async fn run_countdown(
    state: &Arc<AppState>,
    run_id: u64,
    events: &mut broadcast::Receiver<TimerState>,
) {
    debug!("Tick loop started for run {}", run_id);

    let mut ticks = interval_at(Instant::now() + TICK_INTERVAL, TICK_INTERVAL);
    // Ticks skipped while the process is suspended are lost, not replayed
    ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticks.tick() => {
                match state.tick(run_id) {
                    Ok(TickOutcome::Ticked(timer)) => {
                        debug!("Tick: {} remaining", format_time(timer.time_remaining_seconds));
                    }
                    Ok(TickOutcome::Completed(timer)) => {
                        info!(
                            "{} finished cooking ({})",
                            timer.egg_name(),
                            format_time(timer.duration_seconds)
                        );
                        record_completion(state, &timer);

                        let timeout_state = Arc::clone(state);
                        let epoch = timer.notification_epoch;
                        tokio::spawn(async move {
                            notification_timeout(timeout_state, epoch).await;
                        });
                        break;
                    }
                    Ok(TickOutcome::Stale) => {
                        debug!("Run {} superseded, leaving tick loop", run_id);
                        break;
                    }
                    Err(e) => {
                        error!("Tick failed: {}", e);
                        break;
                    }
                }
            }

            event = events.recv() => {
                match event {
                    Ok(timer) => {
                        // Any transition away from this run cancels its ticking
                        if timer.phase != TimerPhase::Running || timer.run_id != run_id {
                            debug!("Run {} cancelled in phase {:?}", run_id, timer.phase);
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!("Tick loop lagged {} timer events", skipped);
                        match state.current_timer() {
                            Ok(timer)
                                if timer.phase == TimerPhase::Running
                                    && timer.run_id == run_id => {}
                            _ => break,
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }
}

/// Append the completion record; a failed write never disturbs the timer
fn record_completion(state: &AppState, timer: &TimerState) {
    let appended = state.history.append(
        timer.egg_name(),
        timer.duration_seconds,
        timer.recorded_preset(),
    );
    if appended.is_none() {
        error!("Completed cook was not recorded to history");
    }
}

/// Hide the completion notification after its display window, unless a
/// dismissal or reconfiguration got there first
pub async fn notification_timeout(state: Arc<AppState>, epoch: u64) {
    sleep(NOTIFICATION_AUTO_HIDE).await;
    match state.clear_notification_if(epoch) {
        Ok(true) => debug!("Completion notification auto-hidden"),
        Ok(false) => {}
        Err(e) => error!("Failed to auto-hide notification: {}", e),
    }
}
