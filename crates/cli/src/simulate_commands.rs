//! Replay a scripted conversation between simulated peers.
//!
//! A script is JSON lines, one step per line. Blank lines and lines starting
//! with `#` are skipped. Peers named in a step join the network on first use.
//!
//! ```text
//! {"op": "toggle", "peer": "bob", "flag": "private_chat"}
//! {"op": "message", "from": "alice", "scope": "private", "to": "bob", "body": "hi"}
//! {"op": "poke", "from": "alice", "to": "bob", "body": "wake up"}
//! ```

use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::{Path, PathBuf},
};

use {
    anyhow::{Context, Result},
    serde::{Deserialize, Serialize},
    tracing::{info, warn},
};

use {
    notifman_common::types::{ChatScope, InfoCategory},
    notifman_filter::NotificationKind,
    notifman_plugin::{
        Error as PluginError,
        loopback::{Delivery, Loopback},
    },
};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    Peer {
        name: String,
    },
    Toggle {
        peer: String,
        flag: NotificationKind,
    },
    Message {
        from: String,
        scope: ChatScope,
        #[serde(default)]
        to: Option<String>,
        body: String,
    },
    Poke {
        from: String,
        to: String,
        #[serde(default)]
        body: String,
    },
    FailSends {
        peer: String,
        failing: bool,
    },
    Info {
        peer: String,
        category: InfoCategory,
    },
}

impl Step {
    fn peers(&self) -> Vec<&str> {
        match self {
            Self::Peer { name } => vec![name.as_str()],
            Self::Toggle { peer, .. } | Self::FailSends { peer, .. } | Self::Info { peer, .. } => {
                vec![peer.as_str()]
            },
            Self::Message { from, to, .. } => std::iter::once(from.as_str())
                .chain(to.as_deref())
                .collect(),
            Self::Poke { from, to, .. } => vec![from.as_str(), to.as_str()],
        }
    }
}

/// What one step did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum Outcome {
    Joined {
        peer: String,
    },
    Toggled {
        peer: String,
        flag: NotificationKind,
        enabled: bool,
        status_line: String,
    },
    Delivered {
        deliveries: Vec<Delivery>,
    },
    SendFailures {
        peer: String,
        failing: bool,
    },
    Info {
        peer: String,
        text: String,
    },
    /// Auto-replies kept bouncing; the network dropped the rest.
    ReplyStorm {
        hops: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub line: usize,
    #[serde(flatten)]
    pub outcome: Outcome,
}

pub fn handle_simulate(
    script: &Path,
    json: bool,
    max_hops: usize,
    config_dir: Option<PathBuf>,
) -> Result<()> {
    let reader: Box<dyn BufRead> = if script == Path::new("-") {
        Box::new(BufReader::new(io::stdin()))
    } else {
        let file = File::open(script)
            .with_context(|| format!("failed to open script {}", script.display()))?;
        Box::new(BufReader::new(file))
    };

    let mut net = Loopback::new().with_max_hops(max_hops);
    if let Some(dir) = config_dir {
        net = net.with_config_dir(dir);
    }

    let reports = run_script(reader, &mut net)?;
    info!(steps = reports.len(), peers = net.peer_names().len(), "simulation finished");

    for report in &reports {
        if json {
            println!("{}", serde_json::to_string(report)?);
        } else {
            print_report(report);
        }
    }
    Ok(())
}

/// Parse and run every step of `reader` against `net`.
pub fn run_script(reader: impl BufRead, net: &mut Loopback) -> Result<Vec<Report>> {
    let mut reports = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        let line = line.with_context(|| format!("failed to read line {line_no}"))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let step: Step = serde_json::from_str(trimmed)
            .with_context(|| format!("line {line_no}: invalid step"))?;
        let outcome = run_step(net, &step).with_context(|| format!("line {line_no}"))?;
        reports.push(Report {
            line: line_no,
            outcome,
        });
    }
    Ok(reports)
}

fn run_step(net: &mut Loopback, step: &Step) -> Result<Outcome> {
    for name in step.peers() {
        net.add_peer(name);
    }

    match step {
        Step::Peer { name } => Ok(Outcome::Joined { peer: name.clone() }),
        Step::Toggle { peer, flag } => {
            let outcome = net.toggle(peer, *flag)?;
            Ok(Outcome::Toggled {
                peer: peer.clone(),
                flag: outcome.kind,
                enabled: outcome.enabled,
                status_line: outcome.status_line,
            })
        },
        Step::Message {
            from,
            scope,
            to,
            body,
        } => delivered(net.send_text(from, *scope, to.as_deref(), body)),
        Step::Poke { from, to, body } => delivered(net.poke(from, to, body)),
        Step::FailSends { peer, failing } => {
            net.set_send_failure(peer, *failing)?;
            Ok(Outcome::SendFailures {
                peer: peer.clone(),
                failing: *failing,
            })
        },
        Step::Info { peer, category } => {
            let plugin = net
                .plugin(peer)
                .ok_or_else(|| PluginError::unknown_peer(peer.as_str()))?;
            Ok(Outcome::Info {
                peer: peer.clone(),
                text: plugin.info_for(*category),
            })
        },
    }
}

fn delivered(result: notifman_plugin::Result<Vec<Delivery>>) -> Result<Outcome> {
    match result {
        Ok(deliveries) => Ok(Outcome::Delivered { deliveries }),
        Err(PluginError::ReplyStorm { hops }) => {
            warn!(hops, "step ended in a reply storm");
            Ok(Outcome::ReplyStorm { hops })
        },
        Err(e) => Err(e.into()),
    }
}

fn print_report(report: &Report) {
    let line = report.line;
    match &report.outcome {
        Outcome::Joined { peer } => println!("{line:>4}  {peer} joined"),
        Outcome::Toggled {
            peer, status_line, ..
        } => println!("{line:>4}  {peer}: {status_line}"),
        Outcome::Delivered { deliveries } => {
            for d in deliveries {
                let mark = if d.shown {
                    "shown "
                } else {
                    "muted "
                };
                println!(
                    "{line:>4}  {mark} {kind:<7} {from} -> {to}: {body}",
                    kind = d.kind,
                    from = d.from,
                    to = d.to,
                    body = d.body,
                );
            }
        },
        Outcome::SendFailures { peer, failing } => {
            let state = if *failing {
                "rejects"
            } else {
                "accepts"
            };
            println!("{line:>4}  {peer}'s client now {state} outgoing messages");
        },
        Outcome::Info { peer, text } => {
            println!("{line:>4}  {peer} info:{}", text.replace('\n', "\n        "));
        },
        Outcome::ReplyStorm { hops } => {
            println!("{line:>4}  reply storm: gave up after {hops} deliveries");
        },
    }
}
