use chrono::NaiveDateTime;
use rand::{Rng, seq::IndexedRandom};

const METHODS: [(&str, u8); 4] = [("GET", 6), ("POST", 2), ("PUT", 1), ("DELETE", 1)];
const PATHS: [(&str, u8); 6] = [
    ("/", 10),
    ("/login", 10),
    ("/api", 50),
    ("/admin", 5),
    ("/splash", 20),
    ("/gallery?page=2", 10),
];
const STATUS: [(u16, u8); 6] = [
    (200, 50),
    (201, 10),
    (400, 10),
    (401, 20),
    (404, 50),
    (500, 5),
];
const REFERRERS: [(&str, u8); 3] = [("-", 20), ("https://example.com/", 5), ("", 1)];
const AGENTS: [(&str, u8); 4] = [
    ("Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0", 20),
    ("Mozilla/5.0 (Macintosh; Intel Mac OS X 14_5) AppleWebKit/605.1.15", 10),
    ("curl/8.5.0", 5),
    ("Wget/1.21.4", 1),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Defect {
    Truncated,
    TextStatus,
    UnterminatedAgent,
    Hostname,
}

const DEFECTS: [Defect; 4] = [
    Defect::Truncated,
    Defect::TextStatus,
    Defect::UnterminatedAgent,
    Defect::Hostname,
];

struct Entry {
    ip: String,
    timestamp: String,
    method: &'static str,
    path: &'static str,
    status: String,
    size: u32,
    referrer: &'static str,
    agent: &'static str,
}

impl Entry {
    fn random<R: Rng + ?Sized>(rng: &mut R, at: NaiveDateTime) -> Self {
        Self {
            ip: format!(
                "192.168.{}.{}",
                rng.random_range(0..256),
                rng.random_range(0..256)
            ),
            timestamp: at.format("%d/%b/%Y:%H:%M:%S +0000").to_string(),
            method: METHODS.choose_weighted(rng, |(_, w)| *w).unwrap().0,
            path: PATHS.choose_weighted(rng, |(_, w)| *w).unwrap().0,
            status: STATUS.choose_weighted(rng, |(_, w)| *w).unwrap().0.to_string(),
            size: rng.random_range(0..20_000),
            referrer: REFERRERS.choose_weighted(rng, |(_, w)| *w).unwrap().0,
            agent: AGENTS.choose_weighted(rng, |(_, w)| *w).unwrap().0,
        }
    }

    fn render(&self) -> String {
        let Self {
            ip,
            timestamp,
            method,
            path,
            status,
            size,
            referrer,
            agent,
        } = self;
        format!(
            "{ip} - - [{timestamp}] \"{method} {path} HTTP/1.1\" {status} {size} \"{referrer}\" \"{agent}\""
        )
    }
}

/// A well-formed combined-format access-log line stamped with `at`.
pub fn generate_access_log<R: Rng + ?Sized>(rng: &mut R, at: NaiveDateTime) -> String {
    Entry::random(rng, at).render()
}

/// A line that looks like an access-log entry but breaks the grammar in one place.
pub fn generate_malformed_log<R: Rng + ?Sized>(rng: &mut R, at: NaiveDateTime) -> String {
    let mut entry = Entry::random(rng, at);
    match DEFECTS.choose(rng).copied().unwrap_or(Defect::Truncated) {
        Defect::Truncated => {
            let line = entry.render();
            let cut = line.find(" \"-\"").or(line.find(" \"h")).unwrap_or(line.len() / 2);
            line[..cut].to_string()
        }
        Defect::TextStatus => {
            entry.status = "OK".into();
            entry.render()
        }
        Defect::UnterminatedAgent => {
            let mut line = entry.render();
            line.pop();
            line
        }
        Defect::Hostname => {
            entry.ip = "gateway.internal".into();
            entry.render()
        }
    }
}
