use std::error::Error;
use std::fs::File;
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use jointgraph::format::{self, Compression};
use jointgraph::{DeserializeError, JointIndex, RoadIndex};

#[derive(Debug, thiserror::Error)]
#[error("{0}: {1}")]
struct IndexLoadError(PathBuf, #[source] DeserializeError);

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliCompression {
    Unknown,
    Raw,
    Gzip,
    Bzip2,
}

impl From<CliCompression> for Compression {
    fn from(c: CliCompression) -> Self {
        match c {
            CliCompression::Unknown => Compression::Unknown,
            CliCompression::Raw => Compression::Raw,
            CliCompression::Gzip => Compression::Gzip,
            CliCompression::Bzip2 => Compression::Bzip2,
        }
    }
}

#[derive(Parser)]
struct Cli {
    /// The path to the serialized road index
    index_file: PathBuf,

    /// Compression of the road index file
    #[arg(long, value_enum, default_value_t = CliCompression::Unknown)]
    compression: CliCompression,

    /// Print the road points of a joint (may be repeated)
    #[arg(long = "joint", value_name = "ID")]
    joints: Vec<u32>,

    /// Print the turn restriction anchor between two features
    #[arg(long, num_args = 2, value_names = ["FROM", "TO"])]
    restriction: Option<Vec<u32>>,
}

pub fn main() -> Result<(), Box<dyn Error>> {
    colog::init();
    let cli = Cli::parse();

    let road_index = load_road_index(&cli.index_file, cli.compression.into())?;
    let num_joints = road_index.joint_id_bound();

    let mut joint_index = JointIndex::new();
    joint_index.build(&road_index, num_joints);

    println!("roads:  {}", road_index.len());
    println!("joints: {}", joint_index.num_joints());
    println!("points: {}", joint_index.num_points());

    for &joint_id in &cli.joints {
        let points = joint_index
            .points(joint_id)
            .map(|rp| rp.to_string())
            .collect::<Vec<_>>();
        if points.is_empty() {
            log::warn!("joint {joint_id} has no points");
        } else {
            println!("joint {joint_id}: {}", points.join(", "));
        }
    }

    if let Some(&[from, to]) = cli.restriction.as_deref() {
        match road_index.get_adjacent_ft_points(from, to) {
            Some(anchor) => println!("{anchor}"),
            None => println!("features {from} and {to} are not adjacent"),
        }
    }

    Ok(())
}

fn load_road_index<P: AsRef<Path>>(
    path: P,
    compression: Compression,
) -> Result<RoadIndex, IndexLoadError> {
    let wrap = |e: DeserializeError| IndexLoadError(PathBuf::from(path.as_ref()), e);

    let f = File::open(path.as_ref()).map_err(|e| wrap(e.into()))?;
    let options = format::Options { compression };
    let road_index = format::read_road_index(&options, f).map_err(wrap)?;

    log::info!(
        "loaded {} roads from {}",
        road_index.len(),
        path.as_ref().display()
    );
    Ok(road_index)
}
