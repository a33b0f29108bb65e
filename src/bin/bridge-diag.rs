// bridge-diag: exercise the bridge end to end against the stub backends
//
// Installs the thread hooks, registers an event handler with narrowed ID
// flags, simulates a worker-thread lifecycle, and runs the stub main loop
// for a configurable number of frames. Useful for eyeballing the log output
// and for smoke-testing the wiring without the engine present.

use std::path::PathBuf;
use std::ptr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use clap::Parser;
use log::{info, warn};

use engine_bridge::config::BridgeConfig;
use engine_bridge::context::BridgeContext;
use engine_bridge::engine::{EngineApi, StubEngine};
use engine_bridge::error::BridgeError;
use engine_bridge::events::{EngineEvent, EventIdFlags, EventType};
use engine_bridge::runtime::{RuntimeThreads, StubRuntime};
use engine_bridge::status::Status;

#[derive(Parser, Debug)]
#[command(name = "bridge-diag", about = "Exercise the engine bridge against the stub backends")]
struct Args {
    /// Path to a JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the number of frames the run callback executes
    #[arg(long)]
    frames: Option<u32>,
}

static FRAME_BUDGET: AtomicU32 = AtomicU32::new(0);
static EVENTS_SEEN: AtomicU32 = AtomicU32::new(0);

extern "C" fn diag_init() -> Status {
    info!("init callback");
    Status::Success
}

extern "C" fn diag_run() -> Status {
    let left = FRAME_BUDGET.load(Ordering::SeqCst);
    if left == 0 {
        return Status::Failure;
    }
    FRAME_BUDGET.store(left - 1, Ordering::SeqCst);
    info!("run callback, {} frame(s) remaining", left - 1);
    Status::Success
}

extern "C" fn diag_exit() {
    info!("exit callback");
}

extern "C" fn diag_handler(event: *const EngineEvent) -> Status {
    // SAFETY: the stub engine passes a valid event for the duration of
    // the call
    let event = unsafe { &*event };
    info!("event delivered: type={:?} id={}", event.event_type, event.id);
    EVENTS_SEEN.fetch_add(1, Ordering::SeqCst);
    Status::Success
}

fn main() -> Result<(), BridgeError> {
    let args = Args::parse();
    let config = BridgeConfig::load_or_default(args.config.as_deref());
    engine_bridge::init_logging_with_filter(Some(&config.log_filter.0));

    let runtime = Arc::new(StubRuntime::new());
    let engine = Arc::new(StubEngine::new());
    let ctx = BridgeContext::with_backends(
        Arc::clone(&runtime) as Arc<dyn RuntimeThreads>,
        Arc::clone(&engine) as Arc<dyn EngineApi>,
    );

    ctx.install_thread_callbacks()?;
    match engine.run_thread_lifecycle() {
        Some((start, stop)) => {
            info!("worker lifecycle: start={} stop={}", start, stop);
        }
        None => warn!("worker lifecycle could not run"),
    }

    ctx.add_event_handler(
        EventType(config.stub.event_type),
        diag_handler,
        EventIdFlags(config.stub.add_id_flags),
        EventIdFlags(config.stub.remove_id_flags),
    )?;
    let delivery = engine.deliver(&EngineEvent::new(EventType(config.stub.event_type), 0));
    info!("event delivery status: {}", delivery);

    FRAME_BUDGET.store(
        args.frames.unwrap_or(config.stub.max_frames),
        Ordering::SeqCst,
    );
    ctx.execute(0, ptr::null_mut(), diag_init, diag_run, diag_exit)?;

    info!(
        "diagnostic run complete, {} event(s) delivered",
        EVENTS_SEEN.load(Ordering::SeqCst)
    );
    Ok(())
}
