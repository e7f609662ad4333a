use anyhow::{Context, Result};
use clap::Parser;
use permcycles::permutation::{DensePermutation, Permutation, SparsePermutation};
use rand::{rngs::SmallRng, SeedableRng};

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err}");
        for cause in err.chain().skip(1) {
            eprintln!("  caused by: {cause}");
        }
        std::process::exit(1);
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "permcycles-demo",
    about = "Walk through inversion, composition, cycles and order for a dense and a sparse permutation."
)]
struct Cli {
    /// Size of the random dense permutation.
    #[arg(short = 'n', long, default_value_t = 5)]
    size: usize,

    /// Seed for the random source. Uses entropy when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Sparse permutation as "size : point image point image ...".
    #[arg(long, default_value = "5 : 0 1 1 0")]
    sparse: String,
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut rng = match cli.seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    };

    println!("=== Dense permutation ===");
    let p = DensePermutation::random(cli.size, &mut rng);
    report(&p, &p.inverse(), &p.compose(&p.inverse()));

    println!();
    println!("=== Sparse permutation ===");
    let s: SparsePermutation = cli
        .sparse
        .parse()
        .with_context(|| format!("invalid sparse permutation {:?}", cli.sparse))?;
    report(&s, &s.inverse(), &s.compose(&s.inverse()));
    println!("fixed points: {:?}", s.fixed_points());
    println!("derangement: {}", s.is_derangement());

    Ok(())
}

fn report<P>(p: &P, inverse: &P, product: &P)
where
    P: Permutation + std::fmt::Display,
{
    println!("P:           {p}");
    println!("P^-1:        {inverse}");
    println!("P * P^-1:    {product}");
    println!("cycles:");
    for cycle in p.cycles() {
        println!("  {cycle}");
    }
    println!("order:       {}", p.order());
}
