use duplex_io::{
    Interface, Lane, LaneConfig, ParityAdjust, PassThrough, Sample, SignAdjust, Supervisor,
    SupervisorConfig,
};
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

#[tokio::main(flavor = "multi_thread", worker_threads = 4)]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug"))
        .format(|buf, record| {
            let ts = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
            writeln!(buf, "[{} {}] {}", ts, record.level(), record.args())
        })
        .init();

    let lane_config = LaneConfig::default();

    // Interface A carries the field-adjusting lanes, B buffers unchanged
    let iface_a = Arc::new(Interface::new(
        Lane::new(ParityAdjust::new(), lane_config.clone()),
        Lane::new(SignAdjust::new(), lane_config.clone()),
    ));
    let iface_b: Arc<Interface<Sample, _, _>> = Arc::new(Interface::new(
        Lane::new(PassThrough::new(), lane_config.clone()),
        Lane::new(PassThrough::new(), lane_config),
    ));

    iface_a.init().await;
    iface_b.init().await;
    println!("✓ Interfaces A and B started");

    let supervisor = Arc::new(Supervisor::new(
        iface_a.clone(),
        iface_b.clone(),
        SupervisorConfig::default(),
    ));

    // Shared flag for shutdown
    let shutdown = Arc::new(AtomicBool::new(false));

    // Feeder: pushes a sample into every lane faster than the workers drain,
    // so the supervisor has moving depths to report
    {
        let iface_a = iface_a.clone();
        let iface_b = iface_b.clone();
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            let mut n: i32 = 0;
            while !shutdown.load(Ordering::Acquire) {
                let sample = Sample::new(n as f32, -n);
                iface_a.add_to_tx(sample).await;
                iface_a.add_to_rx(sample).await;
                iface_b.add_to_tx(sample).await;
                iface_b.add_to_rx(sample).await;
                n = n.wrapping_add(1);
                sleep(Duration::from_millis(300)).await;
            }
        });
    }

    // Ctrl+C handler stops the supervisor; run() below then returns
    {
        let supervisor = supervisor.clone();
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    println!("\n🛑 Shutting down...");
                    shutdown.store(true, Ordering::Release);
                    supervisor.stop();
                }
                Err(err) => {
                    eprintln!("Error listening for Ctrl+C: {}", err);
                }
            }
        });
    }

    println!("🔄 Supervisor is polling interface stats every second");
    println!("⏹️  Press Ctrl+C to stop");
    println!();

    supervisor.run().await;

    // Stop the lane workers and wait for them to wind down
    if let Err(e) = iface_a.shutdown().await {
        eprintln!("Interface A shutdown error: {}", e);
    }
    if let Err(e) = iface_b.shutdown().await {
        eprintln!("Interface B shutdown error: {}", e);
    }

    println!(
        "Final depths: a.tx={} a.rx={} b.tx={} b.rx={}",
        iface_a.tx_depth().await,
        iface_a.rx_depth().await,
        iface_b.tx_depth().await,
        iface_b.rx_depth().await,
    );
    println!("👋 Goodbye!");
}
