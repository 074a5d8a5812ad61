use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::Parser;
use rand::SeedableRng;

use classgen::backend::{JavaBackend, KotlinBackend, SyntaxBackend};
use classgen::manifest::{GenerationOptions, Manifest};
use classgen::pool::RawPool;
use classgen::synth::ClassSynthesizer;
use classgen::universe::TypeUniverse;
use classgen::{naming, profile};

#[derive(Parser)]
#[command(name = "classgen")]
#[command(about = "Generate synthetic Java/Kotlin sources for build benchmarking")]
struct Cli {
    /// Generation profile (embedded name or path to a TOML file)
    #[arg(long, default_value = "default")]
    profile: String,

    /// Scanner hand-off JSON describing the discovered class pool
    #[arg(long)]
    pool: Option<PathBuf>,

    /// Target syntax: java, kotlin, or both
    #[arg(long, default_value = "kotlin")]
    language: String,

    /// Number of classes to generate per language
    #[arg(long, default_value = "20")]
    classes: usize,

    /// Package the generated classes belong to
    #[arg(long, default_value = "com.acme.generated")]
    package: String,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Output base directory
    #[arg(long, default_value = "/tmp/classgen")]
    output: PathBuf,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Determine seed - use provided or generate from current time
    let seed = cli.seed.unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
    });

    let params = match profile::get_profile(&cli.profile) {
        Ok(p) => p,
        Err(e) => {
            eprintln!(
                "error: {} (available: {})",
                e,
                profile::available_profiles().join(", ")
            );
            return ExitCode::FAILURE;
        }
    };

    let pool = match &cli.pool {
        Some(path) => match RawPool::from_file(path) {
            Ok(pool) => pool,
            Err(e) => {
                eprintln!("error: {}", e);
                return ExitCode::FAILURE;
            }
        },
        // No pool: generation still works, every slot takes the fallback
        // path. Useful for smoke runs.
        None => RawPool::default(),
    };

    let backends: Vec<Box<dyn SyntaxBackend>> = match cli.language.as_str() {
        "java" => vec![Box::new(JavaBackend)],
        "kotlin" => vec![Box::new(KotlinBackend)],
        "both" => vec![Box::new(JavaBackend), Box::new(KotlinBackend)],
        other => {
            eprintln!("error: unknown language '{}' (java, kotlin, both)", other);
            return ExitCode::FAILURE;
        }
    };

    if cli.output.exists() {
        eprintln!(
            "error: output directory already exists: {}",
            cli.output.display()
        );
        return ExitCode::FAILURE;
    }
    if let Err(e) = fs::create_dir_all(&cli.output) {
        eprintln!(
            "error: failed to create output directory '{}': {}",
            cli.output.display(),
            e
        );
        return ExitCode::FAILURE;
    }

    let options = GenerationOptions {
        classes: cli.classes,
        language: cli.language.clone(),
        package: cli.package.clone(),
    };
    let manifest = Manifest::new(seed, cli.profile.clone(), options);
    if let Err(e) = manifest.write_to_dir(&cli.output) {
        eprintln!("error: failed to write manifest: {}", e);
        return ExitCode::FAILURE;
    }

    let package_path: PathBuf = cli.package.split('.').collect();
    for backend in &backends {
        // Each language gets its own universe lookup state and its own
        // seeded RNG, so single-language runs reproduce exactly the same
        // sources as a "both" run.
        let mut universe = TypeUniverse::new(pool.clone());
        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);

        let dir = cli.output.join(backend.name()).join(&package_path);
        if let Err(e) = fs::create_dir_all(&dir) {
            eprintln!("error: failed to create '{}': {}", dir.display(), e);
            return ExitCode::FAILURE;
        }

        let mut synthesizer = ClassSynthesizer::new(&mut universe, backend.as_ref(), &params);
        for index in 0..cli.classes {
            let class_name = naming::class_name(index);
            let source = match synthesizer.generate_class(&mut rng, &cli.package, &class_name) {
                Ok(text) => text,
                Err(e) => {
                    eprintln!("error: generating {}: {}", class_name, e);
                    return ExitCode::FAILURE;
                }
            };
            let file = dir.join(backend.file_name(&class_name));
            if let Err(e) = fs::write(&file, source) {
                eprintln!("error: failed to write '{}': {}", file.display(), e);
                return ExitCode::FAILURE;
            }
        }
    }

    println!("classgen: generated synthetic sources");
    println!("  seed:     {seed}");
    println!("  profile:  {}", cli.profile);
    println!("  pool:     {} types", pool.type_count());
    println!("  classes:  {} per language", cli.classes);
    println!("  output:   {}", cli.output.display());

    ExitCode::SUCCESS
}
