use sso_logout_rs::{ChannelOptions, NotificationChannel, NotificationHandler, Redirect};
use tokio::sync::mpsc;

/// Prints every callback and forwards redirects to main
struct ConsoleHandler {
    redirects: mpsc::UnboundedSender<Redirect>,
}

impl NotificationHandler for ConsoleHandler {
    fn connected(&self) {
        println!("✅ Real-time logout notifications enabled");
    }

    fn force_logout_prompt(&self, message: &str) {
        println!("⚠️  You were logged out from another location: {}", message);
        println!("   Redirecting to the login page in 3 seconds...");
    }

    fn broadcast_notice(&self, message: &str) {
        println!("📢 System notice: {}", message);
    }

    fn reconnect_exhausted(&self) {
        println!("❌ Real-time notifications unavailable, restart to retry");
    }

    fn redirect(&self, target: Redirect) {
        let _ = self.redirects.send(target);
    }
}

/// Listen for logout notifications on a running SSO server
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sso_logout_rs=debug".into()),
        )
        .init();

    let origin = std::env::var("SSO_ORIGIN").unwrap_or_else(|_| "http://localhost:8080".into());
    let session_cookie = std::env::var("SSO_SESSION_COOKIE").ok();
    if session_cookie.is_none() {
        println!("SSO_SESSION_COOKIE not set, the channel will stay disconnected");
    }

    let (redirect_tx, mut redirect_rx) = mpsc::unbounded_channel();
    let channel = NotificationChannel::builder(
        &origin,
        ChannelOptions {
            session_cookie,
            ..Default::default()
        },
    )
    .handler(ConsoleHandler {
        redirects: redirect_tx,
    })
    .build()?;

    println!("📡 Listening on {}\n", channel.endpoint());
    channel.start();

    let mut state = channel.watch_state();
    loop {
        tokio::select! {
            Some(target) = redirect_rx.recv() => {
                println!("➡️  {}", target.path());
                break;
            }
            changed = state.changed() => {
                if changed.is_err() {
                    break;
                }
                let current = *state.borrow_and_update();
                println!("state: {:?}", current);
            }
            _ = tokio::signal::ctrl_c() => {
                println!("Shutting down");
                break;
            }
        }
    }

    channel.cleanup();
    // wait until the close has been issued
    if let Some(snapshot) = channel.snapshot().await {
        println!("final state: {:?}", snapshot.state);
    }
    Ok(())
}
