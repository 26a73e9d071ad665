//! Generates a deterministic sample roster (`sample_roster.csv`) for trying
//! out the dashboard without a real spreadsheet export.

use anyhow::{Context, Result};

/// Minimal deterministic PRNG (xorshift64*), no dependency needed for
/// sample data.
struct SimpleRng {
    state: u64,
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        SimpleRng {
            state: seed.max(1),
        }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545_f491_4f6c_dd1d)
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }

    fn range(&mut self, lo: i64, hi: i64) -> i64 {
        lo + (self.next_u64() % (hi - lo) as u64) as i64
    }
}

const NAMES: &[&str] = &[
    "Ada", "Bram", "Ciri", "Dag", "Elin", "Falk", "Greta", "Hugo", "Iris", "Joon", "Kira",
    "Lino", "Mara", "Nils", "Oda", "Pax", "Quin", "Rosa", "Sven", "Tova",
];

const FACTIONS: &[&str] = &["Harbor Guild", "Iron Pact", "Verdant Ring", "Null Sect"];

const TAGS: &[&str] = &[
    "scout", "medic", "armorer", "cartographer", "envoy", "smuggler", "archivist", "pilot",
];

fn main() -> Result<()> {
    let path = "sample_roster.csv";
    let mut writer = csv::Writer::from_path(path).context("creating sample roster")?;
    writer.write_record([
        "Name",
        "Handle",
        "Faction",
        "Tags",
        "Bio",
        "Image",
        "GPS",
        "TwFollowers",
        "TwFollowing",
    ])?;

    let mut rng = SimpleRng::new(7);
    for (i, name) in NAMES.iter().enumerate() {
        let faction = rng.pick(FACTIONS);
        let tags = format!("{}, {}", rng.pick(TAGS), rng.pick(TAGS));
        let bio = format!("{name} of the {faction}.");

        // Leave a few rows without GPS / follower data so the stats line and
        // the bucket filter have something to show.
        let gps = if i % 5 == 4 {
            String::new()
        } else {
            let lat = rng.range(-60, 70) as f64 + 0.5;
            let lon = rng.range(-170, 170) as f64 + 0.25;
            format!("{lat}, {lon}")
        };
        let followers = if i % 7 == 6 {
            String::new()
        } else {
            rng.range(0, 30_000).to_string()
        };

        writer.write_record([
            *name,
            &format!("@{}", name.to_lowercase()),
            faction,
            &tags,
            &bio,
            "",
            &gps,
            &followers,
            &rng.range(0, 900).to_string(),
        ])?;
    }

    writer.flush().context("writing sample roster")?;
    println!("Wrote {path}");
    Ok(())
}
