//! Parsing of the line commands read from stdin.

/// One parsed input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Empty,
    List,
    /// 1-based position in the listed library.
    Play(usize),
    TogglePause,
    Next,
    Previous,
    /// Absolute position in milliseconds.
    Seek(u64),
    Forward,
    Rewind,
    Repeat,
    Shuffle,
    Close,
    Status,
    Help,
    Quit,
}

pub const HELP: &str = "\
list            show the library
play N          play entry N (the whole library becomes the queue)
p | pause       play/pause
n | next        next entry
b | prev        restart, or previous entry early in a track
seek S | M:SS   jump to a position
ff | rw         scrub forward/back
r | repeat      toggle repeat-one
s | shuffle     toggle shuffle
c | close       stop and hide the player
status          show what is playing
q | quit        exit";

/// Parse `"90"`, `"1:30"` or `"1:02:03"` into milliseconds.
pub fn parse_position(s: &str) -> Option<u64> {
    let mut total: u64 = 0;
    let parts: Vec<&str> = s.split(':').collect();
    if parts.is_empty() || parts.len() > 3 {
        return None;
    }
    for (i, part) in parts.iter().enumerate() {
        let v: u64 = part.trim().parse().ok()?;
        // Minutes and seconds after the leading field must be below 60.
        if i > 0 && v >= 60 {
            return None;
        }
        total = total.checked_mul(60)?.checked_add(v)?;
    }
    total.checked_mul(1000)
}

pub fn parse_command(line: &str) -> Result<Input, String> {
    let mut words = line.split_whitespace();
    let Some(cmd) = words.next() else {
        return Ok(Input::Empty);
    };
    let arg = words.next();
    if words.next().is_some() {
        return Err(format!("too many arguments for '{cmd}'"));
    }

    let no_arg = |input: Input| match arg {
        None => Ok(input),
        Some(a) => Err(format!("'{cmd}' takes no argument (got '{a}')")),
    };

    match cmd.to_ascii_lowercase().as_str() {
        "list" | "ls" => no_arg(Input::List),
        "play" => {
            let n = arg.ok_or("usage: play N")?;
            match n.parse::<usize>() {
                Ok(n) if n >= 1 => Ok(Input::Play(n)),
                _ => Err(format!("not a track number: '{n}'")),
            }
        }
        "p" | "pause" | "toggle" => no_arg(Input::TogglePause),
        "n" | "next" => no_arg(Input::Next),
        "b" | "prev" | "previous" => no_arg(Input::Previous),
        "seek" => {
            let pos = arg.ok_or("usage: seek SECONDS | M:SS")?;
            parse_position(pos)
                .map(Input::Seek)
                .ok_or_else(|| format!("not a position: '{pos}'"))
        }
        "ff" => no_arg(Input::Forward),
        "rw" => no_arg(Input::Rewind),
        "r" | "repeat" => no_arg(Input::Repeat),
        "s" | "shuffle" => no_arg(Input::Shuffle),
        "c" | "close" | "stop" => no_arg(Input::Close),
        "status" | "?" => no_arg(Input::Status),
        "h" | "help" => no_arg(Input::Help),
        "q" | "quit" | "exit" => no_arg(Input::Quit),
        other => Err(format!("unknown command '{other}' (try 'help')")),
    }
}
