use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use clap::{Parser, Subcommand};
use rand::Rng;
use uuid::Uuid;

use protocol::PresenceMeta;
use wheel::{SpinPhase, WheelClient};

mod transport;

use transport::WsTransport;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("display name required; pass --name or set WHEEL_NAME")]
    MissingIdentity,
    #[error("not connected: the channel never reached the subscribed state")]
    NotConnected,
    #[error(transparent)]
    Transport(#[from] wheel::TransportError),
    #[error(transparent)]
    Session(#[from] wheel::SessionError),
}

#[derive(Parser, Debug)]
#[command(name = "wheel-cli", about = "Shared wheel channel CLI")]
struct Cli {
    #[arg(long, env = "WHEEL_RELAY_URL", default_value = "ws://127.0.0.1:4000")]
    relay_url: String,

    #[arg(long, env = "WHEEL_CHANNEL", default_value = "lunch-wheel")]
    channel: String,

    /// Display name announced through presence. Joining without one aborts.
    #[arg(long, env = "WHEEL_NAME")]
    name: Option<String>,

    #[arg(long, env = "WHEEL_AVATAR_URL")]
    avatar_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Join the channel and print roster, spin and cursor activity.
    Watch {
        /// How long to stay joined, in seconds.
        #[arg(long, default_value_t = 60)]
        seconds: u64,
    },
    /// Add participants, run one start→stop cycle and print the winner.
    Spin {
        /// Participant names to add before spinning.
        #[arg(required = true)]
        participants: Vec<String>,
        /// How long to keep the wheel spinning before stopping, in ms.
        #[arg(long, default_value_t = 1_500)]
        hold_ms: u64,
    },
    /// Stream synthetic cursor positions across the shared container.
    Cursor {
        #[arg(long, default_value_t = 50)]
        samples: u32,
        #[arg(long, default_value_t = 100)]
        interval_ms: u64,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = run(Cli::parse()).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let name = cli.name.clone().ok_or(CliError::MissingIdentity)?;
    let meta = PresenceMeta::new(Uuid::new_v4(), name, cli.avatar_url.clone(), epoch_ms());

    let url = format!("{}/ws/{}", cli.relay_url.trim_end_matches('/'), cli.channel);
    let transport = WsTransport::connect(&url).await?;
    let mut client = WheelClient::join(&cli.channel, meta, transport)?;

    println!("connecting to {url}…");
    let started = Instant::now();
    if !drive_until(&mut client, started, 5_000, |c| c.is_ready()).await {
        return Err(CliError::NotConnected);
    }
    println!("subscribed as {}", client.participant_id());

    let result = match cli.command {
        Command::Watch { seconds } => watch(&mut client, started, seconds).await,
        Command::Spin { participants, hold_ms } => {
            spin(&mut client, started, &participants, hold_ms).await
        }
        Command::Cursor { samples, interval_ms } => {
            cursor(&mut client, started, samples, interval_ms).await
        }
    };

    client.leave();
    result
}

async fn watch(
    client: &mut WheelClient<WsTransport>,
    started: Instant,
    seconds: u64,
) -> Result<(), CliError> {
    let deadline = Duration::from_secs(seconds);
    let mut last_roster: Vec<String> = Vec::new();
    let mut last_phase = client.phase();
    let mut last_peers = 0_usize;

    while started.elapsed() < deadline {
        step(client, started).await;

        if client.participants() != last_roster.as_slice() {
            last_roster = client.participants().to_vec();
            println!("roster: {last_roster:?}");
        }
        if client.phase() != last_phase {
            last_phase = client.phase();
            match last_phase {
                SpinPhase::Spinning => println!("wheel spinning…"),
                SpinPhase::Slowing => println!("wheel slowing…"),
                SpinPhase::Idle => match client.winner() {
                    Some(winner) => println!("winner: {winner}"),
                    None => println!("wheel idle"),
                },
            }
        }
        if client.cursors().len() != last_peers {
            last_peers = client.cursors().len();
            println!("{last_peers} peer cursor(s) live");
        }
        if !client.is_connected() {
            println!("not connected");
            break;
        }
    }
    Ok(())
}

async fn spin(
    client: &mut WheelClient<WsTransport>,
    started: Instant,
    participants: &[String],
    hold_ms: u64,
) -> Result<(), CliError> {
    for name in participants {
        client.add_participant(name);
    }
    println!("roster: {:?}", client.participants());

    if !client.start_spin() {
        println!("wheel is already in motion; watching instead");
    }

    let stop_at = started.elapsed() + Duration::from_millis(hold_ms);
    while started.elapsed() < stop_at {
        step(client, started).await;
    }

    let mut rng = rand::rng();
    client.stop_spin(&mut rng);

    if !drive_until(client, started, 10_000, |c| c.phase() == SpinPhase::Idle).await {
        return Err(CliError::NotConnected);
    }
    match client.winner() {
        Some(winner) => println!("winner: {winner}"),
        None => println!("no winner (roster drained)"),
    }
    Ok(())
}

async fn cursor(
    client: &mut WheelClient<WsTransport>,
    started: Instant,
    samples: u32,
    interval_ms: u64,
) -> Result<(), CliError> {
    let mut rng = rand::rng();
    for i in 0..samples {
        let px = f64::from(i % 100) * 6.0 + rng.random_range(0.0..6.0);
        let py = f64::from(i % 100) * 4.0 + rng.random_range(0.0..4.0);
        let pos = client.move_cursor(px, py, 600.0, 400.0);
        println!("sent cursor ({:.1}%, {:.1}%)", pos.x, pos.y);

        let next = started.elapsed() + Duration::from_millis(interval_ms);
        while started.elapsed() < next {
            step(client, started).await;
        }
        for (id, record) in client.cursors().iter() {
            println!(
                "  {} ({}) at ({:.1}%, {:.1}%)",
                record.username, id, record.position.x, record.position.y
            );
        }
    }
    Ok(())
}

/// One cooperative step: pump the transport, fire due timers, yield briefly.
async fn step(client: &mut WheelClient<WsTransport>, started: Instant) {
    client.poll();
    let now_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    client.advance_to(now_ms);
    tokio::time::sleep(Duration::from_millis(15)).await;
}

/// Drive the client until `cond` holds or `deadline_ms` passes.
async fn drive_until(
    client: &mut WheelClient<WsTransport>,
    started: Instant,
    deadline_ms: u64,
    cond: impl Fn(&WheelClient<WsTransport>) -> bool,
) -> bool {
    let deadline = Duration::from_millis(deadline_ms);
    let begun = Instant::now();
    while begun.elapsed() < deadline {
        step(client, started).await;
        if cond(client) {
            return true;
        }
    }
    false
}

fn epoch_ms() -> i64 {
    let Ok(dur) = SystemTime::now().duration_since(UNIX_EPOCH) else {
        return 0;
    };
    i64::try_from(dur.as_millis()).unwrap_or(0)
}
