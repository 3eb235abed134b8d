use anyhow::{anyhow, Result};
use clap::Parser;

use std::{fs, path::PathBuf};

use minimal_gbafix::{build_rom, set_game_code, set_title};

/// Turn the firmware's ELF file into a GBA ROM or multiboot image.
///
/// Whether the image is a cartridge ROM or a multiboot image is decided by
/// where the ELF file loads: 0x08000000 or 0x02000000.
#[derive(Parser, Debug)]
#[command(version, long_about = None)]
struct Cli {
    /// Input elf file
    input: PathBuf,

    /// Output file, defaults to INPUT with its extension replaced by .gba
    /// (or .mb.gba for multiboot images)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Title, at most 12 bytes. Defaults to the input file name
    #[arg(short, long)]
    title: Option<String>,

    /// Game code, 4 bytes
    #[arg(short = 'c', long)]
    game_code: Option<String>,

    /// Maker code
    #[arg(short, long)]
    maker_code: Option<u16>,

    /// Version of the game
    #[arg(short = 'r', long)]
    game_version: Option<u8>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut header = gbafix::GBAHeader::default();

    let title = match &cli.title {
        Some(title) => title.clone(),
        None => cli
            .input
            .file_stem()
            .ok_or_else(|| anyhow!("Invalid filename {}", cli.input.display()))?
            .to_string_lossy()
            .into_owned(),
    };
    set_title(&mut header, &title);

    if let Some(game_code) = &cli.game_code {
        set_game_code(&mut header, game_code);
    }
    if let Some(maker_code) = cli.maker_code {
        header.maker_code = maker_code.to_le_bytes();
    }
    if let Some(game_version) = cli.game_version {
        header.version = game_version;
    }

    let rom = build_rom(&fs::read(&cli.input)?, header)?;

    let output = cli.output.unwrap_or_else(|| match rom.layout {
        minimal_gbafix::Layout::Cartridge => cli.input.with_extension("gba"),
        minimal_gbafix::Layout::Multiboot => cli.input.with_extension("mb.gba"),
    });
    fs::write(&output, &rom.bytes)?;

    println!(
        "wrote {:?} image of {} bytes to {}",
        rom.layout,
        rom.bytes.len(),
        output.display()
    );

    Ok(())
}
