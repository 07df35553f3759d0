use argh::FromArgs;
use std::path::PathBuf;
use std::time::Instant;

use depthcloud::dnn::{Monodepth, MonodepthConfig};
use depthcloud::image::Image;
use depthcloud::imgproc::{colormap, stats};
use depthcloud::io::{functional as F, png};
use depthcloud::k3d::{
    camera::PinholeCameraIntrinsic,
    io::ply::{write_ply, PlyEncoding},
    unproject,
};

#[derive(FromArgs)]
/// Estimate the depth of a single image and save it as a colormapped png
struct Args {
    /// path to the encoder onnx model
    #[argh(option, default = "PathBuf::from(\"models/mono_640x192/encoder.onnx\")")]
    encoder: PathBuf,

    /// path to the depth decoder onnx model
    #[argh(option, default = "PathBuf::from(\"models/mono_640x192/depth.onnx\")")]
    decoder: PathBuf,

    /// path to an input image
    #[argh(
        option,
        short = 'i',
        default = "PathBuf::from(\"assets/Neckertal_20150527-6384.jpg\")"
    )]
    image_path: PathBuf,

    /// path to the output depth image
    #[argh(option, short = 'o', default = "PathBuf::from(\"depthmap.png\")")]
    output: PathBuf,

    /// path to a json file with the camera intrinsics (fx, fy, cx, cy)
    #[argh(option)]
    intrinsics: Option<PathBuf>,

    /// optional path to save the valid points as a ply file
    #[argh(option)]
    pointcloud: Option<PathBuf>,

    /// path to the ORT dylib
    #[argh(option)]
    ort_dylib_path: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    if let Some(ort_dylib_path) = &args.ort_dylib_path {
        std::env::set_var("ORT_DYLIB_PATH", ort_dylib_path);
    }

    let model = Monodepth::new(MonodepthConfig::new(&args.encoder, &args.decoder))?;

    let image: Image<u8, 3> = F::read_image_any_rgb8(&args.image_path)?;
    log::info!("{}: {}", args.image_path.display(), image.size());

    let time = Instant::now();
    let disparity = model.forward(&image)?;
    log::info!("inference: {:?}", time.elapsed());

    let intrinsic = match &args.intrinsics {
        Some(path) => PinholeCameraIntrinsic::from_json_file(path)?,
        None => PinholeCameraIntrinsic::default(),
    };

    let points = unproject::disparity_to_points(&disparity, &intrinsic)?;
    println!("{points}");

    log::info!(
        "{} of {} pixels have a valid depth",
        points.num_valid(),
        disparity.size().area()
    );

    if let Some(path) = &args.pointcloud {
        write_ply(path, &points.to_pointcloud(), PlyEncoding::default())?;
        log::info!("saved point cloud to {}", path.display());
    }

    let (vmin, _) = stats::find_min_max(&disparity)?;
    let vmax = stats::percentile(&disparity, 95.0)?;
    log::debug!("colormap range: [{vmin}, {vmax}]");

    let mut depthmap = Image::<u8, 1>::from_size_val(disparity.size(), 0)?;
    colormap::apply_greys(&disparity, &mut depthmap, vmin, vmax)?;

    png::write_image_png_gray8(&args.output, &depthmap)?;
    log::info!("saved depth image to {}", args.output.display());

    Ok(())
}
