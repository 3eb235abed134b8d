use anyhow::{anyhow, ensure, Result};
use elf::{abi::PT_LOAD, endian::AnyEndian, ElfBytes};

const GBA_HEADER_SIZE: usize = 192;
/// Where the BIOS jumps to in a multiboot image once the transfer is done.
const MULTIBOOT_ENTRY_OFFSET: usize = 0xC0;

/// Where an image is run from, worked out from where its first byte loads.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layout {
    /// Executes in place from the cartridge.
    Cartridge,
    /// Sent over the link cable and executed from EWRAM.
    Multiboot,
}

impl Layout {
    #[must_use]
    pub const fn base_address(self) -> u64 {
        match self {
            Layout::Cartridge => 0x0800_0000,
            Layout::Multiboot => 0x0200_0000,
        }
    }

    #[must_use]
    pub const fn max_len(self) -> u64 {
        match self {
            Layout::Cartridge => 32 * 1024 * 1024,
            Layout::Multiboot => 256 * 1024,
        }
    }

    fn contains(self, start: u64, len: u64) -> bool {
        start >= self.base_address() && start + len <= self.base_address() + self.max_len()
    }

    fn for_address(address: u64) -> Option<Self> {
        [Layout::Cartridge, Layout::Multiboot]
            .into_iter()
            .find(|layout| layout.contains(address, 0))
    }
}

/// A ROM image ready to be written out.
#[derive(Debug)]
pub struct Rom {
    pub layout: Layout,
    pub bytes: Vec<u8>,
}

struct LoadSegment<'data> {
    address: u64,
    data: &'data [u8],
}

/// Builds the image from the ELF file's loadable segments, placed at their
/// load (not run) addresses so data destined for IWRAM lands where crt0
/// copies it from.
///
/// The start of the image must be the crt0 entry branch followed by header
/// space, which is overwritten with `header`. Multiboot images also need the
/// branch at 0xC0. Cartridge images are padded to a power of two.
pub fn build_rom(input: &[u8], mut header: gbafix::GBAHeader) -> Result<Rom> {
    let elf_file = ElfBytes::<AnyEndian>::minimal_parse(input)?;
    let segments = load_segments(&elf_file)?;

    let first = segments
        .first()
        .ok_or_else(|| anyhow!("elf file has no loadable segments"))?;
    let layout = Layout::for_address(first.address).ok_or_else(|| {
        anyhow!(
            "image loads at {:#010x}, which is neither cartridge rom nor ewram",
            first.address
        )
    })?;

    ensure!(
        first.address == layout.base_address(),
        "{layout:?} image must start at {:#010x} but starts at {:#010x}",
        layout.base_address(),
        first.address
    );
    ensure!(
        first.data.len() > GBA_HEADER_SIZE,
        "first segment must be at least as big as the gba header"
    );
    ensure_branch(first.data, 0, "entry point")?;
    if layout == Layout::Multiboot {
        ensure_branch(first.data, MULTIBOOT_ENTRY_OFFSET, "multiboot entry point")?;
    }

    let mut bytes = Vec::new();
    for segment in &segments {
        let len = segment.data.len() as u64;
        ensure!(
            layout.contains(segment.address, len),
            "segment at {:#010x} ({len} bytes) does not fit in a {layout:?} image",
            segment.address
        );

        let offset = (segment.address - layout.base_address()) as usize;
        ensure!(
            offset >= bytes.len(),
            "segment at {:#010x} overlaps the one before it",
            segment.address
        );

        bytes.resize(offset, 0);
        bytes.extend_from_slice(segment.data);
    }

    header.start_code = bytes[0..4].try_into()?;
    header.update_checksum();
    bytes[..GBA_HEADER_SIZE].copy_from_slice(bytemuck::bytes_of(&header));

    if layout == Layout::Cartridge {
        bytes.resize(bytes.len().next_power_of_two(), 0);
    }

    Ok(Rom { layout, bytes })
}

fn load_segments<'data>(elf_file: &ElfBytes<'data, AnyEndian>) -> Result<Vec<LoadSegment<'data>>> {
    let program_headers = elf_file
        .segments()
        .ok_or_else(|| anyhow!("elf file has no program headers"))?;

    let mut segments = Vec::new();
    for program_header in program_headers.iter() {
        // zero sized segments are .bss, which crt0 clears at runtime
        if program_header.p_type != PT_LOAD || program_header.p_filesz == 0 {
            continue;
        }

        segments.push(LoadSegment {
            address: program_header.p_paddr,
            data: elf_file.segment_data(&program_header)?,
        });
    }

    segments.sort_by_key(|segment| segment.address);
    Ok(segments)
}

fn ensure_branch(data: &[u8], offset: usize, what: &str) -> Result<()> {
    const ARM_ALWAYS_BRANCH: u8 = 0xEA;

    let word = data
        .get(offset..offset + 4)
        .ok_or_else(|| anyhow!("image is too short to contain the {what}"))?;
    ensure!(
        word[3] == ARM_ALWAYS_BRANCH,
        "expected an ARM branch at the {what} (offset {offset:#x}), found {word:02x?}"
    );
    Ok(())
}

/// Copies `title` into the header's 12 byte title field, dropping anything
/// past the 12th byte.
pub fn set_title(header: &mut gbafix::GBAHeader, title: &str) {
    for (i, &c) in title.as_bytes().iter().enumerate().take(12) {
        header.title[i] = c;
    }
}

/// Copies `game_code` into the header's 4 byte game code field.
pub fn set_game_code(header: &mut gbafix::GBAHeader, game_code: &str) {
    for (i, &c) in game_code.as_bytes().iter().enumerate().take(4) {
        header.game_code[i] = c;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FILE_HEADER_SIZE: usize = 52;
    const PROGRAM_HEADER_SIZE: usize = 32;

    // b 0xC0 from either entry slot
    const BRANCH: [u8; 4] = [0x2E, 0x00, 0x00, 0xEA];

    struct Segment {
        run_address: u32,
        load_address: u32,
        data: Vec<u8>,
        memory_size: u32,
    }

    fn loaded_at(address: u32, data: Vec<u8>) -> Segment {
        Segment {
            run_address: address,
            load_address: address,
            memory_size: data.len() as u32,
            data,
        }
    }

    /// What crt0 starts with: the entry branch, header space, and the
    /// multiboot entry branch, followed by `len - 196` bytes of code.
    fn entry(len: usize) -> Vec<u8> {
        let mut data: Vec<u8> = (0..len).map(|i| (i % 251) as u8 + 1).collect();
        data[0..4].copy_from_slice(&BRANCH);
        data[MULTIBOOT_ENTRY_OFFSET..MULTIBOOT_ENTRY_OFFSET + 4].copy_from_slice(&BRANCH);
        data
    }

    /// A 32 bit little endian ARM executable with only program headers.
    fn build_elf(segments: &[Segment]) -> Vec<u8> {
        let program_headers_offset = FILE_HEADER_SIZE;
        let data_offset = FILE_HEADER_SIZE + PROGRAM_HEADER_SIZE * segments.len();

        let mut elf = vec![0x7f, b'E', b'L', b'F', 1, 1, 1, 0];
        elf.resize(16, 0);
        elf.extend_from_slice(&2u16.to_le_bytes()); // executable
        elf.extend_from_slice(&40u16.to_le_bytes()); // arm
        elf.extend_from_slice(&1u32.to_le_bytes());
        elf.extend_from_slice(&0x0800_0000u32.to_le_bytes());
        elf.extend_from_slice(&(program_headers_offset as u32).to_le_bytes());
        elf.extend_from_slice(&0u32.to_le_bytes()); // no section headers
        elf.extend_from_slice(&0u32.to_le_bytes());
        elf.extend_from_slice(&(FILE_HEADER_SIZE as u16).to_le_bytes());
        elf.extend_from_slice(&(PROGRAM_HEADER_SIZE as u16).to_le_bytes());
        elf.extend_from_slice(&(segments.len() as u16).to_le_bytes());
        elf.extend_from_slice(&40u16.to_le_bytes());
        elf.extend_from_slice(&0u16.to_le_bytes());
        elf.extend_from_slice(&0u16.to_le_bytes());
        assert_eq!(elf.len(), FILE_HEADER_SIZE);

        let mut offset = data_offset;
        for segment in segments {
            for word in [
                PT_LOAD,
                offset as u32,
                segment.run_address,
                segment.load_address,
                segment.data.len() as u32,
                segment.memory_size,
                5,
                4,
            ] {
                elf.extend_from_slice(&word.to_le_bytes());
            }
            offset += segment.data.len();
        }

        for segment in segments {
            elf.extend_from_slice(&segment.data);
        }

        elf
    }

    fn rom(segments: &[Segment]) -> Result<Rom> {
        build_rom(&build_elf(segments), gbafix::GBAHeader::default())
    }

    #[test]
    fn header_replaces_the_start_of_the_image() {
        let code = entry(256);
        let elf = build_elf(&[loaded_at(0x0800_0000, code.clone())]);
        let mut header = gbafix::GBAHeader::default();
        set_title(&mut header, "MINIMAL");

        let rom = build_rom(&elf, header).unwrap();

        assert_eq!(rom.layout, Layout::Cartridge);
        assert_eq!(rom.bytes.len(), 256);
        assert_eq!(&rom.bytes[0..4], &BRANCH, "start code comes from the elf");
        assert_eq!(&rom.bytes[0xA0..0xA7], b"MINIMAL");
        assert_eq!(&rom.bytes[192..], &code[192..]);
    }

    #[test]
    fn cartridge_is_padded_to_a_power_of_two() {
        let rom = rom(&[loaded_at(0x0800_0000, entry(300))]).unwrap();

        assert_eq!(rom.bytes.len(), 512);
        assert!(rom.bytes[300..].iter().all(|&b| b == 0));
    }

    #[test]
    fn gaps_between_segments_are_zero_filled() {
        let rom = rom(&[
            loaded_at(0x0800_0000, entry(200)),
            loaded_at(0x0800_0100, (1..=16).collect()),
        ])
        .unwrap();

        assert_eq!(rom.bytes.len(), 512);
        assert!(rom.bytes[200..0x100].iter().all(|&b| b == 0));
        assert_eq!(&rom.bytes[0x100..0x110], &(1..=16).collect::<Vec<u8>>()[..]);
    }

    #[test]
    fn iwram_data_is_placed_at_its_load_address() {
        let iwram = Segment {
            run_address: 0x0300_0000,
            load_address: 0x0800_0100,
            data: vec![0x55; 8],
            memory_size: 8,
        };

        let rom = rom(&[loaded_at(0x0800_0000, entry(256)), iwram]).unwrap();

        assert_eq!(rom.bytes.len(), 512);
        assert_eq!(&rom.bytes[0x100..0x108], &[0x55; 8]);
    }

    #[test]
    fn bss_takes_no_space() {
        let bss = Segment {
            run_address: 0x0300_0000,
            load_address: 0x0300_0000,
            data: vec![],
            memory_size: 0x400,
        };

        let rom = rom(&[loaded_at(0x0800_0000, entry(256)), bss]).unwrap();

        assert_eq!(rom.bytes.len(), 256);
    }

    #[test]
    fn multiboot_image_runs_from_ewram() {
        let code = entry(300);

        let rom = rom(&[loaded_at(0x0200_0000, code.clone())]).unwrap();

        assert_eq!(rom.layout, Layout::Multiboot);
        assert_eq!(rom.bytes.len(), 300, "multiboot images are not padded");
        assert_eq!(&rom.bytes[0..4], &BRANCH);
        assert_eq!(&rom.bytes[0xC0..0xC4], &BRANCH);
        assert_eq!(&rom.bytes[192..], &code[192..]);
    }

    #[test]
    fn multiboot_image_needs_the_second_entry_branch() {
        let mut code = entry(256);
        code[0xC0..0xC4].copy_from_slice(&[0; 4]);

        let error = rom(&[loaded_at(0x0200_0000, code.clone())]).unwrap_err();
        assert!(error.to_string().contains("multiboot entry point"), "{error}");

        rom(&[loaded_at(0x0800_0000, code)]).expect("cartridges start from offset 0 only");
    }

    #[test]
    fn multiboot_image_must_fit_in_ewram() {
        let error = rom(&[
            loaded_at(0x0200_0000, entry(256)),
            loaded_at(0x0203_FFF0, vec![1; 32]),
        ])
        .unwrap_err();

        assert!(error.to_string().contains("does not fit"), "{error}");
    }

    #[test]
    fn image_must_start_with_a_branch() {
        let mut code = entry(256);
        code[0..4].copy_from_slice(&[0; 4]);

        let error = rom(&[loaded_at(0x0800_0000, code)]).unwrap_err();

        assert!(error.to_string().contains("expected an ARM branch"), "{error}");
    }

    #[test]
    fn image_must_start_at_the_base_address() {
        let error = rom(&[loaded_at(0x0800_0100, entry(256))]).unwrap_err();

        assert!(error.to_string().contains("must start at 0x08000000"), "{error}");
    }

    #[test]
    fn image_must_load_into_rom_or_ewram() {
        let error = rom(&[loaded_at(0x0300_0000, entry(256))]).unwrap_err();

        assert!(error.to_string().contains("neither cartridge rom nor ewram"), "{error}");
    }

    #[test]
    fn first_segment_must_fit_the_header() {
        let error = rom(&[loaded_at(0x0800_0000, vec![0; 100])]).unwrap_err();

        assert!(error.to_string().contains("gba header"), "{error}");
    }

    #[test]
    fn overlapping_segments_are_rejected() {
        let error = rom(&[
            loaded_at(0x0800_0000, entry(256)),
            loaded_at(0x0800_00F0, vec![1; 16]),
        ])
        .unwrap_err();

        assert!(error.to_string().contains("overlaps"), "{error}");
    }

    #[test]
    fn rejects_files_that_are_not_elf() {
        assert!(build_rom(b"not an elf file", gbafix::GBAHeader::default()).is_err());
    }

    #[test]
    fn title_and_game_code_are_truncated() {
        let mut header = gbafix::GBAHeader::default();

        set_title(&mut header, "A VERY LONG TITLE");
        set_game_code(&mut header, "BLUEX");

        assert_eq!(&header.title, b"A VERY LONG ");
        assert_eq!(&header.game_code, b"BLUE");
    }
}
