use std::thread;
use std::time::Instant;
use clap::Parser;
use log::{info, LevelFilter};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use simple_logger::SimpleLogger;
use hiergrid::config::{HierarchyConfig, VariableConfig};
use hiergrid::geometry::{Centering, CellCentered};
use hiergrid::hierarchy_ops::HierarchyDataOps;
use hiergrid::message::channel::ChannelCommunicator;
use hiergrid::scalar::ElementType;




/**
 * Weak scaling of the hierarchy-wide reductions: every rank owns the same
 * number of patches, and the ranks run as threads exchanging messages over
 * in-process channels.
 */
#[derive(Debug, Parser)]
#[clap(version = "0.1", about = "Weak scaling of hierarchy-wide data operations")]
struct Opts {
    #[clap(short = 'p', long, default_value = "4")]
    num_ranks: usize,

    #[clap(short = 'n', long, default_value = "4")]
    patches_per_rank: usize,

    #[clap(short = 's', long, default_value = "64")]
    patch_size: i64,

    #[clap(short = 'i', long, default_value = "10")]
    iterations: usize,

    #[clap(long)]
    no_refined_level: bool,

    #[clap(short = 'l', long, default_value = "info")]
    log_level: LevelFilter,
}




// ============================================================================
struct Report {
    entries: usize,
    max: f64,
    l2_norm: f64,
    seconds: f64,
}

fn run(opts: &Opts, comm: ChannelCommunicator) -> Result<Report, hiergrid::Error> {
    let rank = hiergrid::message::comm::Communicator::rank(&comm);
    let variables = vec![
        VariableConfig { name: "u".to_string(), centering: Centering::Cell, element: ElementType::Double, depth: 1, ghost: 2 },
        VariableConfig { name: "v".to_string(), centering: Centering::Cell, element: ElementType::Double, depth: 1, ghost: 2 },
    ];
    let config = HierarchyConfig::uniform(2, opts.patch_size, opts.patches_per_rank, opts.num_ranks, !opts.no_refined_level, variables);
    let (mut hierarchy, ids) = config.build(rank, opts.num_ranks)?;
    let (u, v) = (ids[0], ids[1]);

    let mut ops = HierarchyDataOps::<CellCentered, f64, _>::with_levels(&mut hierarchy, &comm, 0, config.levels.len() - 1)?;
    let mut rng = SmallRng::seed_from_u64(rank as u64);
    let start = Instant::now();
    let mut report = Report { entries: 0, max: 0.0, l2_norm: 0.0, seconds: 0.0 };

    for _ in 0..opts.iterations {
        ops.set_to_scalar(u, 7.0, false);
        ops.set_random_values(v, 1.0, 0.0, true, &mut rng);
        ops.axpy(v, 2.0, u, v, true);
        report.max = ops.max(u, true);
        report.entries = ops.number_of_entries(u, true);
        report.l2_norm = ops.l2_norm(v, None, false);
    }
    report.seconds = start.elapsed().as_secs_f64();
    Ok(report)
}




// ============================================================================
fn main() {
    let opts = Opts::parse();

    if let Err(e) = SimpleLogger::new().with_level(opts.log_level).init() {
        eprintln!("{}", e)
    }
    info!("{:?}", opts);

    let opts = std::sync::Arc::new(opts);
    let handles: Vec<_> = ChannelCommunicator::group(opts.num_ranks)
        .into_iter()
        .map(|comm| {
            let opts = opts.clone();
            thread::spawn(move || run(&opts, comm))
        })
        .collect();

    for (rank, handle) in handles.into_iter().enumerate() {
        match handle.join() {
            Ok(Ok(report)) if rank == 0 => {
                println!();
                println!("ranks ................. {}", opts.num_ranks);
                println!("entries ............... {}", report.entries);
                println!("max ................... {}", report.max);
                println!("l2 norm ............... {:.6}", report.l2_norm);
                println!("total ................. {:.3}s", report.seconds);
                println!("s / iteration ......... {:.3e}", report.seconds / opts.iterations.max(1) as f64);
            }
            Ok(Ok(_)) => {}
            Ok(Err(e)) => eprintln!("rank {}: {}", rank, e),
            Err(_) => eprintln!("rank {} panicked", rank),
        }
    }
}
