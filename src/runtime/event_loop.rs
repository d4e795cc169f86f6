use std::io::{BufRead, Write};

use tracing::debug;

use crate::config;
use crate::player::{Player, Track};

use super::commands::{HELP, Input, parse_command};
use super::status_line::status_line;

/// Read commands from `input` until `quit` or end of input, driving `player`.
pub fn run<R: BufRead, W: Write>(
    input: R,
    out: &mut W,
    settings: &config::Settings,
    tracks: &[Track],
    player: &Player,
) -> Result<(), Box<dyn std::error::Error>> {
    write!(out, "psalter> ")?;
    out.flush()?;

    for line in input.lines() {
        let line = line?;
        match parse_command(&line) {
            Ok(Input::Quit) => return Ok(()),
            Ok(cmd) => handle_input(cmd, out, settings, tracks, player)?,
            Err(msg) => writeln!(out, "{msg}")?,
        }
        write!(out, "psalter> ")?;
        out.flush()?;
    }

    writeln!(out)?;
    Ok(())
}

fn handle_input<W: Write>(
    cmd: Input,
    out: &mut W,
    settings: &config::Settings,
    tracks: &[Track],
    player: &Player,
) -> Result<(), Box<dyn std::error::Error>> {
    debug!(?cmd, "input");
    match cmd {
        Input::Empty | Input::Quit => {}
        Input::Help => writeln!(out, "{HELP}")?,
        Input::List => {
            if tracks.is_empty() {
                writeln!(out, "library is empty")?;
            }
            for (i, t) in tracks.iter().enumerate() {
                writeln!(out, "{:>4}. {}", i + 1, t.display)?;
            }
        }
        Input::Play(n) => match tracks.get(n - 1) {
            // The listed library is always passed as the queue context.
            Some(track) => player.load_and_play(track.clone(), Some(tracks.to_vec()))?,
            None => writeln!(out, "no track {n} (library has {})", tracks.len())?,
        },
        Input::TogglePause => player.toggle_play_pause()?,
        Input::Next => player.play_next()?,
        Input::Previous => player.play_previous()?,
        Input::Seek(ms) => player.seek(ms)?,
        Input::Forward | Input::Rewind => {
            let step = settings.controls.scrub_seconds.saturating_mul(1000);
            let pos = player.snapshot().position_millis;
            let target = if cmd == Input::Forward {
                pos.saturating_add(step)
            } else {
                pos.saturating_sub(step)
            };
            player.seek(target)?;
        }
        Input::Repeat => player.toggle_repeat_one()?,
        Input::Shuffle => player.toggle_shuffle()?,
        Input::Close => player.close()?,
        Input::Status => writeln!(out, "{}", status_line(&player.snapshot(), &settings.ui))?,
    }
    Ok(())
}
