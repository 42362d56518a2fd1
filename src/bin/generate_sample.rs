use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform index in `0..n`.
    fn below(&mut self, n: usize) -> usize {
        (self.next_f64() * n as f64) as usize % n
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

struct Movie {
    title: String,
    gross: Option<f64>,
    score: Option<f64>,
    year: Option<i64>,
    director: String,
}

/// (name, typical score, typical gross in USD)
const DIRECTORS: [(&str, f64, f64); 12] = [
    ("Ava Lindqvist", 8.1, 3.0e8),
    ("Bruno Okafor", 6.4, 1.2e8),
    ("Chen Wei", 7.7, 5.5e8),
    ("Dana Moreau", 5.9, 4.0e7),
    ("Emil Novak", 7.2, 2.1e8),
    ("Farah Haddad", 8.4, 9.0e7),
    ("Gus Whitfield", 6.8, 7.5e8),
    ("Hana Sato", 7.9, 1.6e8),
    ("Ivan Petrov", 5.2, 6.0e7),
    ("Julia Reyes", 7.0, 3.3e8),
    ("Kofi Mensah", 6.1, 2.5e7),
    ("Lena Brandt", 8.8, 1.1e8),
];

const ROWS: usize = 400;

fn generate(rng: &mut SimpleRng) -> Vec<Movie> {
    (0..ROWS)
        .map(|i| {
            let (name, typical_score, typical_gross) = DIRECTORS[rng.below(DIRECTORS.len())];
            let year = 2000 + rng.below(19) as i64;
            let score = rng.gauss(typical_score, 0.6).clamp(1.0, 10.0);
            let gross = (typical_gross * rng.gauss(1.0, 0.35)).max(1.0e5);

            // Sprinkle the gaps real scraped data has.
            let roll = rng.next_f64();
            Movie {
                title: format!("Untitled Project {:03}", i + 1),
                gross: (roll >= 0.08).then_some(gross.round()),
                score: (!(0.08..0.14).contains(&roll)).then_some((score * 10.0).round() / 10.0),
                year: (!(0.14..0.17).contains(&roll)).then_some(year),
                director: if (0.17..0.22).contains(&roll) {
                    String::new()
                } else {
                    name.to_string()
                },
            }
        })
        .collect()
}

fn write_csv(movies: &[Movie], path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["title", "gross", "score", "year", "director"])?;
    for (i, m) in movies.iter().enumerate() {
        // Non-numeric junk instead of blanks on some rows.
        let gross = match m.gross {
            Some(g) => g.to_string(),
            None if i % 2 == 0 => "N/A".to_string(),
            None => String::new(),
        };
        writer.write_record([
            m.title.clone(),
            gross,
            m.score.map(|s| s.to_string()).unwrap_or_default(),
            m.year.map(|y| y.to_string()).unwrap_or_default(),
            m.director.clone(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(movies: &[Movie], path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("title", DataType::Utf8, false),
        Field::new("gross", DataType::Float64, true),
        Field::new("score", DataType::Float64, true),
        Field::new("year", DataType::Int64, true),
        Field::new("director", DataType::Utf8, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from_iter_values(movies.iter().map(|m| m.title.as_str()))),
            Arc::new(movies.iter().map(|m| m.gross).collect::<Float64Array>()),
            Arc::new(movies.iter().map(|m| m.score).collect::<Float64Array>()),
            Arc::new(movies.iter().map(|m| m.year).collect::<Int64Array>()),
            Arc::new(StringArray::from_iter_values(movies.iter().map(|m| m.director.as_str()))),
        ],
    )?;

    let file = std::fs::File::create(path)?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let out_dir = PathBuf::from(std::env::args().nth(1).unwrap_or_else(|| ".".into()));
    std::fs::create_dir_all(&out_dir)?;

    let mut rng = SimpleRng::new(42);
    let movies = generate(&mut rng);

    let csv_path = out_dir.join("movies.csv");
    let parquet_path = out_dir.join("movies.parquet");
    write_csv(&movies, &csv_path)?;
    write_parquet(&movies, &parquet_path)?;

    println!(
        "Wrote {} movies to {} and {}",
        movies.len(),
        csv_path.display(),
        parquet_path.display()
    );
    Ok(())
}
