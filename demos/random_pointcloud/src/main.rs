use argh::FromArgs;
use rand::{rngs::StdRng, SeedableRng};
use std::path::PathBuf;

use depthcloud::k3d::io::ply::{write_ply, PlyEncoding};
use depthcloud::k3d::random::random_pointcloud;

#[derive(FromArgs)]
/// Generate a random point cloud and save it as a ply file
struct Args {
    /// path to the output ply file
    #[argh(option, short = 'o', default = "PathBuf::from(\"./data.ply\")")]
    output: PathBuf,

    /// number of points to generate
    #[argh(option, short = 'n', default = "100")]
    num_points: usize,

    /// seed for a reproducible cloud
    #[argh(option)]
    seed: Option<u64>,

    /// write an ascii file instead of binary
    #[argh(switch)]
    ascii: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let pointcloud = match args.seed {
        Some(seed) => random_pointcloud(args.num_points, &mut StdRng::seed_from_u64(seed)),
        None => random_pointcloud(args.num_points, &mut rand::rng()),
    };

    let encoding = if args.ascii {
        PlyEncoding::Ascii
    } else {
        PlyEncoding::BinaryLittleEndian
    };

    write_ply(&args.output, &pointcloud, encoding)?;

    log::info!(
        "wrote {} points to {} ({})",
        pointcloud.len(),
        args.output.display(),
        encoding.keyword()
    );

    Ok(())
}
