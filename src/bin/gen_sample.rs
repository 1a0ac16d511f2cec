//! Sample backup generator for exercising smsslicer.
//!
//! Usage: cargo run --features gen-sample --bin gen_sample -- [messages] [contacts] [output]
//! Example: cargo run --features gen-sample --bin gen_sample -- 500000 200 sms-sample.xml

use std::env;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::time::Instant;

use chrono::{DateTime, Local, Utc};
use rand::Rng;
use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

const FIRST_NAMES: &[&str] = &[
    "Alice", "Bob", "Carol", "Dave", "Erin", "Frank", "Grace", "Heidi", "Иван", "Мария", "村上",
    "محمد", "O'Brien", "Zoë",
];

const BODIES: &[&str] = &[
    "On my way",
    "Call me when you get this",
    "Running 10 min late, sorry!",
    "Tom & Jerry tonight?",
    "She said \"maybe\" <3",
    "ok",
    "Line one\nLine two",
    "Comma, separated, words",
    "👍",
    "🔥🔥🔥 did you see that?!",
    "",
];

fn main() -> io::Result<()> {
    let args: Vec<String> = env::args().collect();

    let count: usize = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(100_000);
    let contacts: usize = args
        .get(2)
        .and_then(|s| s.parse().ok())
        .unwrap_or(50)
        .max(1);
    let output = args.get(3).map_or("sms-sample.xml", String::as_str);

    println!("🧪 Sample Backup Generator");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("   Messages: {count}");
    println!("   Contacts: {contacts}");
    println!("   Output:   {output}");
    println!();

    let mut rng = rand::thread_rng();
    let people = make_contacts(&mut rng, contacts);

    // A few contacts get most of the traffic
    let weights: Vec<u32> = (1..=people.len()).map(|rank| (1000 / rank as u32).max(1)).collect();
    let pick = WeightedIndex::new(&weights).map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    let now = Utc::now().timestamp_millis();
    let oldest = now - 365 * DAY_MS;

    let file = File::create(output)?;
    let mut writer = BufWriter::with_capacity(1024 * 1024, file);

    writeln!(writer, "<?xml version='1.0' encoding='UTF-8' standalone='yes' ?>")?;
    writeln!(
        writer,
        "<!--File Created By smsslicer gen_sample v{} on {}-->",
        env!("CARGO_PKG_VERSION"),
        Local::now().format("%d/%m/%Y %H:%M:%S")
    )?;
    writeln!(
        writer,
        "<smses count=\"{count}\" backup_set=\"{}\" backup_date=\"{now}\" type=\"full\">",
        backup_set_id(&mut rng)
    )?;

    let start = Instant::now();
    let mut bytes_written: usize = 0;

    for i in 0..count {
        let (address, name) = &people[pick.sample(&mut rng)];
        let date = rng.gen_range(oldest..=now);
        let sent = rng.gen_bool(0.45);
        let body = BODIES.choose(&mut rng).copied().unwrap_or_default();

        let line = sms_line(address, name, date, sent, body);
        bytes_written += line.len();
        writer.write_all(line.as_bytes())?;

        if (i + 1) % 10000 == 0 {
            let elapsed = start.elapsed().as_secs_f64();
            eprint!(
                "\r   Generated {}/{} ({:.1} MB, {:.0} msg/s)",
                i + 1,
                count,
                bytes_written as f64 / 1_000_000.0,
                (i + 1) as f64 / elapsed
            );
        }
    }

    writeln!(writer, "</smses>")?;
    writer.flush()?;

    let elapsed = start.elapsed();
    println!("\n\n✅ Done!");
    println!("   Size: {:.2} MB", bytes_written as f64 / 1_000_000.0);
    println!("   Time: {:.2}s", elapsed.as_secs_f64());

    Ok(())
}

/// `(address, contact_name)` pairs; some contacts have no saved name.
fn make_contacts(rng: &mut impl Rng, n: usize) -> Vec<(String, String)> {
    (0..n)
        .map(|i| {
            let address = match i % 4 {
                0 => format!("+1555{:07}", rng.gen_range(0..10_000_000)),
                1 => format!("+44 7700 {:06}", rng.gen_range(0..1_000_000)),
                2 => format!("{}", rng.gen_range(10_000..100_000)),
                _ => format!("(555) {:03}-{:04}", rng.gen_range(0..1000), rng.gen_range(0..10_000)),
            };
            let name = if i % 7 == 6 {
                String::new()
            } else {
                format!("{} {}", FIRST_NAMES[i % FIRST_NAMES.len()], i / FIRST_NAMES.len() + 1)
            };
            (address, name)
        })
        .collect()
}

fn backup_set_id(rng: &mut impl Rng) -> String {
    let hex: String = (0..32)
        .map(|_| char::from_digit(rng.gen_range(0..16), 16).unwrap_or('0'))
        .collect();
    format!("{}-{}-{}-{}-{}", &hex[..8], &hex[8..12], &hex[12..16], &hex[16..20], &hex[20..])
}

fn sms_line(address: &str, name: &str, date: i64, sent: bool, body: &str) -> String {
    let readable = DateTime::from_timestamp_millis(date)
        .map(|dt| dt.with_timezone(&Local).format("%b %-d, %Y %-I:%M:%S %p").to_string())
        .unwrap_or_default();
    let contact = if name.is_empty() { "(Unknown)" } else { name };

    format!(
        "  <sms protocol=\"0\" address=\"{}\" date=\"{date}\" type=\"{}\" subject=\"null\" body=\"{}\" \
         toa=\"null\" sc_toa=\"null\" service_center=\"null\" read=\"1\" status=\"-1\" locked=\"0\" \
         date_sent=\"{date}\" sub_id=\"1\" readable_date=\"{}\" contact_name=\"{}\" />\n",
        escape_xml(address),
        if sent { 2 } else { 1 },
        escape_xml(body),
        escape_xml(&readable),
        escape_xml(contact)
    )
}

fn escape_xml(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            '\n' => escaped.push_str("&#10;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
