// crates/clipscout-cli/src/main.rs
//
// Command-line driver standing in for the presentation layer: load files
// into the registry, fetch timestamps from the detection service (or take
// them from --at), extract one still per timestamp for the selected file,
// write the PNGs, and replay the timestamps over the seek bus.

use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use crossbeam_channel::Receiver;

use clipscout_client::{DetectOptions, DetectionClient, TranscriptionClient};
use clipscout_core::helpers::time::{format_duration, format_timestamp};
use clipscout_core::{MediaFile, MediaRegistry, MediaResult, SeekBus, SeekEvent};
use clipscout_media::MediaWorker;

/// Find moments in local videos and extract a still frame for each.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Video files to load
    #[arg(value_name = "FILE", required = true)]
    files: Vec<PathBuf>,

    /// Description of the moment to detect (requires a running server)
    #[arg(short, long, value_name = "TEXT")]
    prompt: Option<String>,

    /// Detection service base URL
    #[arg(long, default_value = "http://localhost:5000")]
    server: String,

    /// Manual timestamps in seconds, applied to every file (skips detection)
    #[arg(long = "at", value_name = "SECONDS")]
    at: Vec<f64>,

    /// Sample one frame every N seconds during detection
    #[arg(long, default_value_t = 1.0, value_name = "N")]
    every_n_seconds: f64,

    /// Upper bound on sampled frames per detection request
    #[arg(long, default_value_t = 20, value_name = "N")]
    max_frames: u32,

    /// Also fetch a transcription for each file
    #[arg(long)]
    transcribe: bool,

    /// Directory for extracted frames
    #[arg(short, long, default_value = "frames")]
    out: PathBuf,
}

// Worst-case wall time we allow a single probe or extraction to take
// before giving up on the worker.
const RESULT_WAIT: Duration = Duration::from_secs(120);

fn main() -> Result<()> {
    let args = Args::parse();
    ffmpeg_the_third::init().context("FFmpeg init failed")?;

    if args.prompt.is_none() && args.at.is_empty() && !args.transcribe {
        bail!("nothing to do: pass --prompt (with a server), --at timestamps, or --transcribe");
    }

    // ── Load ──────────────────────────────────────────────────────────────
    let mut registry = MediaRegistry::new();
    registry.add_files(args.files.iter().map(MediaFile::from_path));

    let worker = MediaWorker::new();
    for entry in registry.entries() {
        worker.probe_file(entry.file.id, entry.file.path.clone());
    }
    drain_probes(&worker.rx, &mut registry)?;

    // ── Timestamps ────────────────────────────────────────────────────────
    if let Some(prompt) = &args.prompt {
        let client = DetectionClient::new(&args.server);
        let opts = DetectOptions {
            every_n_seconds: args.every_n_seconds,
            max_frames:      args.max_frames,
        };
        // detect() swallows request failures into an empty list, so a dead
        // server degrades to "no moments found" rather than an abort.
        let lists: Vec<(uuid::Uuid, Vec<f64>)> = registry
            .entries()
            .iter()
            .map(|e| (e.file.id, client.detect(&e.file.path, prompt, opts)))
            .collect();
        for (id, list) in lists {
            registry.set_timestamps_for(id, list)?;
        }
    } else {
        let lists = vec![args.at.clone(); registry.len()];
        registry.replace_all_timestamps(lists);
    }

    if args.transcribe {
        let client = TranscriptionClient::new(&args.server);
        for entry in registry.entries() {
            println!("{}:", entry.file.name);
            for seg in client.transcribe(&entry.file.path) {
                println!(
                    "  [{} – {}] {}",
                    format_timestamp(seg.start),
                    format_timestamp(seg.end),
                    seg.text
                );
            }
        }
    }

    // ── Extract for the selected file ─────────────────────────────────────
    let entry = registry
        .selected_entry()
        .context("registry is empty after load")?;
    let (id, path, name) = (entry.file.id, entry.file.path.clone(), entry.file.name.clone());
    let timestamps = entry.timestamps.to_vec();
    println!("{name}: {} timestamps", timestamps.len());

    worker.extract(id, path, timestamps);
    let frames = loop {
        match worker.rx.recv_timeout(RESULT_WAIT)? {
            MediaResult::FrameBatch { id: got, timestamps, frames } => {
                // Discard batches that no longer match the current
                // selection — a slow extraction for a previously selected
                // file must not overwrite the current one's frames.
                let current = registry.selected_entry();
                let stale = current
                    .map(|e| e.file.id != got || e.timestamps != timestamps)
                    .unwrap_or(true);
                if stale {
                    eprintln!("[cli] dropping stale frame batch for {got}");
                    continue;
                }
                break frames;
            }
            MediaResult::Error { msg, .. } => bail!("extraction failed: {msg}"),
            _ => continue, // stray probe results
        }
    };

    std::fs::create_dir_all(&args.out)
        .with_context(|| format!("cannot create {}", args.out.display()))?;
    let stem = PathBuf::from(&name)
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();
    for frame in &frames {
        let file = args.out.join(format!("{stem}_{:08.3}s.png", frame.timestamp));
        std::fs::write(&file, &frame.png)
            .with_context(|| format!("cannot write {}", file.display()))?;
        println!(
            "  {} → {} ({}x{})",
            format_timestamp(frame.timestamp),
            file.display(),
            frame.width,
            frame.height
        );
    }

    // ── Seek bus replay ───────────────────────────────────────────────────
    // A mounted player would subscribe exactly like this stub; clicking a
    // frame in the UI corresponds to each publish below.
    let bus = SeekBus::new();
    let player = bus.subscribe(move |e: &SeekEvent| {
        println!("[player] {name} seek → {}", format_timestamp(e.seconds));
    });
    for frame in &frames {
        bus.publish(SeekEvent { seconds: frame.timestamp });
    }
    player.unsubscribe();

    worker.shutdown();
    Ok(())
}

/// Wait for every probed file to report info+thumbnail or an error, and
/// print a one-line summary per file.
fn drain_probes(rx: &Receiver<MediaResult>, registry: &mut MediaRegistry) -> Result<()> {
    let mut pending:  HashSet<uuid::Uuid> = registry.files().map(|f| f.id).collect();
    let mut got_info: HashSet<uuid::Uuid> = HashSet::new();
    let mut failed:   Vec<uuid::Uuid> = Vec::new();

    while !pending.is_empty() {
        match rx.recv_timeout(RESULT_WAIT)? {
            MediaResult::Info { id, info } => {
                got_info.insert(id);
                if let Some(file) = registry.files().find(|f| f.id == id) {
                    println!(
                        "loaded {} — {}, {}x{}",
                        file.name,
                        format_duration(info.duration),
                        info.width,
                        info.height
                    );
                }
            }
            MediaResult::Thumbnail { id, .. } => {
                pending.remove(&id);
            }
            MediaResult::Error { id, msg } => {
                pending.remove(&id);
                // An error after Info means only the preview thumbnail
                // failed; the file itself probes and decodes, so it stays.
                if got_info.contains(&id) {
                    eprintln!("[cli] thumbnail failed for {id}: {msg}");
                } else {
                    eprintln!("[cli] probe failed for {id}: {msg}");
                    failed.push(id);
                }
            }
            MediaResult::FrameBatch { .. } => {}
        }
    }

    // Unreadable files leave the registry so extraction never touches them.
    for id in failed {
        registry.delete_file(id);
    }
    Ok(())
}
