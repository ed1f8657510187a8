use anyhow::{Context, Result, bail};
use clap::Parser;
use mbr::MasterBootRecord;
use std::fs;
use std::path::{Path, PathBuf};
use vmdk::{Descriptor, DiskType, Template};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Raw disk image to describe
    image: PathBuf,

    /// Output VMDK descriptor path
    output: PathBuf,

    /// Virtual disk adapter: ide, buslogic, lsilogic or legacyESX
    #[arg(long = "type", default_value = "ide")]
    disk_type: DiskType,

    /// Descriptor template to use instead of the built-in one
    #[arg(long)]
    template: Option<PathBuf>,

    /// Print the decoded MBR before writing the descriptor
    #[arg(long)]
    dump: bool,
}

fn banner() {
    println!(
        "{} {} initiated.",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );
    println!();
}

fn analyse(image: &Path) -> Result<MasterBootRecord> {
    println!("Analysing image:");
    print!("{}", image.display());
    let mbr = MasterBootRecord::open(image)
        .with_context(|| format!("failed to read MBR from {}", image.display()))?;
    println!(" [{} bytes]", mbr.image_size_bytes());
    println!();

    if !mbr.is_valid_mbr() {
        println!("WARNING: no bootable partition of a known type in the partition table");
    }
    if !mbr.has_boot_signature() {
        println!("WARNING: boot sector does not end with 55 AA");
    }
    let table_sectors = mbr.total_sectors_from_partition_table();
    let image_sectors = mbr.total_sectors_from_image_size();
    if table_sectors > image_sectors {
        println!(
            "WARNING: partition table claims {} sectors, image holds {}",
            table_sectors, image_sectors
        );
    }

    Ok(mbr)
}

/// Writing the descriptor over the image would destroy it.
fn check_distinct(image: &Path, output: &Path) -> Result<()> {
    if let (Ok(image), Ok(output)) = (fs::canonicalize(image), fs::canonicalize(output)) {
        if image == output {
            bail!(
                "output {} is the input image; refusing to overwrite it",
                output.display()
            );
        }
    }
    Ok(())
}

fn run(args: &Args) -> Result<()> {
    check_distinct(&args.image, &args.output)?;

    let mbr = analyse(&args.image)?;
    if args.dump {
        println!("{}", mbr);
        println!();
    }

    let image_location = args.image.to_string_lossy();
    let descriptor = Descriptor::from_mbr(&mbr, args.disk_type, &image_location);
    println!("Number of sectors:\t{}", descriptor.sectors);
    println!("Number of cylinders:\t{}", descriptor.cylinders);
    println!("Heads per track:\t{}", descriptor.heads_per_track);
    println!("Sectors per track:\t{}", descriptor.sectors_per_track);
    println!();

    let template = match &args.template {
        Some(path) => {
            println!("Loading VMDK template {}...", path.display());
            Template::load(path)
                .with_context(|| format!("failed to load template {}", path.display()))?
        }
        None => Template::default(),
    };

    print!("Writing VMDK file to: ");
    template
        .write(&descriptor.values(), &args.output)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    println!("{}", args.output.display());

    println!("All done.");
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    banner();
    run(&args)
}
