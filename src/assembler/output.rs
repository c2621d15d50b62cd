use super::image::Image;
use crate::spec::types::hw::{Word, MEMORY_WORDS, WORD_WIDTH};
use itertools::Itertools;
use std::fmt::Display;
use strum_macros::{Display as StrumDisplay, EnumIter, EnumString};

const BANK_WORDS: usize = 16;
const BANKED_HEADER: &str = "v3.0 hex words addressed";

const HEX_DIGITS: usize = 4;

/// A rendering of a memory image. Every format is a pure function of the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, EnumString, StrumDisplay)]
pub enum OutputFormat {
    #[strum(to_string = "bin")]
    Bin,
    #[strum(to_string = "hex")]
    Hex,
    // Logisim's addressed memory file.
    #[strum(to_string = "hexv3")]
    Banked,
    #[strum(to_string = "vhdl")]
    Vhdl,
    #[strum(to_string = "verilog", serialize = "vrlg")]
    Verilog,
}

impl Default for OutputFormat {
    fn default() -> Self {
        OutputFormat::Bin
    }
}

impl OutputFormat {
    /// The file extension written when the output path does not carry one.
    pub fn default_extension(self) -> &'static str {
        match self {
            OutputFormat::Bin | OutputFormat::Hex => "data",
            OutputFormat::Banked => "hex",
            OutputFormat::Vhdl => "vhd",
            OutputFormat::Verilog => "v",
        }
    }

    pub fn render(self, image: &Image) -> Vec<String> {
        match self {
            OutputFormat::Bin => image.words().iter().map(|w| bin_word(*w)).collect(),
            OutputFormat::Hex => image.words().iter().map(|w| hex_word(*w)).collect(),
            OutputFormat::Banked => render_banked(image),
            OutputFormat::Vhdl => render_vhdl(image),
            OutputFormat::Verilog => render_verilog(image),
        }
    }

    /// The rendering as file contents: lines joined by `\n`, with no trailing terminator.
    pub fn render_text(self, image: &Image) -> String {
        self.render(image).join("\n")
    }

    /// Only the flat formats carry every word in a recoverable form.
    pub fn is_decodable(self) -> bool {
        match self {
            OutputFormat::Bin | OutputFormat::Hex => true,
            _ => false,
        }
    }

    pub fn decode<S: AsRef<str>>(self, lines: &[S]) -> Result<Image, DecodeError> {
        let (radix, width) = match self {
            OutputFormat::Bin => (2, WORD_WIDTH),
            OutputFormat::Hex => (16, HEX_DIGITS),
            _ => return Err(DecodeError::Unsupported(self)),
        };

        if lines.len() != MEMORY_WORDS {
            return Err(DecodeError::WrongLength(lines.len()));
        }

        let words = lines
            .iter()
            .enumerate()
            .map(|(idx, line)| decode_word(line.as_ref(), radix, width).ok_or(idx))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|idx| DecodeError::BadWord(idx + 1, lines[idx].as_ref().to_owned()))?;

        Image::from_words(words).ok_or(DecodeError::WrongLength(lines.len()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    Unsupported(OutputFormat),
    WrongLength(usize),
    BadWord(usize, String),
}

impl Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeError::Unsupported(format) => {
                write!(f, "The '{}' format cannot be decoded", format)
            }
            DecodeError::WrongLength(found) => write!(
                f,
                "Expected {} words, found {} lines",
                MEMORY_WORDS, found
            ),
            DecodeError::BadWord(line, token) => {
                write!(f, "Malformed word '{}' at line {}", token, line)
            }
        }
    }
}

impl std::error::Error for DecodeError {}

fn hex_word(word: Word) -> String {
    format!("{:04X}", word)
}

fn bin_word(word: Word) -> String {
    format!("{:016b}", word)
}

fn decode_word(token: &str, radix: u32, width: usize) -> Option<Word> {
    if token.len() != width || !token.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    Word::from_str_radix(token, radix).ok()
}

fn render_banked(image: &Image) -> Vec<String> {
    let banks = image.words().chunks(BANK_WORDS).enumerate().map(|(idx, bank)| {
        format!(
            "{:03x}: {}",
            idx * BANK_WORDS,
            bank.iter().map(|w| format!("{:04x}", w)).join(" ")
        )
    });

    std::iter::once(BANKED_HEADER.to_owned())
        .chain(banks)
        .collect()
}

fn render_vhdl(image: &Image) -> Vec<String> {
    let mut lines = vec![
        "-- program RAM".to_owned(),
        format!(
            "signal RAM: RAM_ARRAY_16b (0 to {}) := (",
            MEMORY_WORDS - 1
        ),
    ];
    lines.extend(
        image
            .nonzero()
            .map(|(addr, word)| format!("    {} => x\"{}\",", addr, hex_word(word))),
    );
    lines.push("    others => x\"0000\"".to_owned());
    lines.push(");".to_owned());
    lines
}

fn render_verilog(image: &Image) -> Vec<String> {
    let mut lines = vec![
        "// program RAM".to_owned(),
        "initial begin".to_owned(),
        "    integer i;".to_owned(),
        format!("    for(i = 0; i < {}; i = i + 1) begin", MEMORY_WORDS),
        "        ram[i] = 16'h0000;".to_owned(),
        "    end".to_owned(),
        String::new(),
    ];
    lines.extend(
        image
            .nonzero()
            .map(|(addr, word)| format!("    ram[{}] = 16'h{};", addr, hex_word(word))),
    );
    lines.push("end".to_owned());
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    fn sample() -> Image {
        let mut image = Image::new();
        image.set(0x000, 0x7001);
        image.set(0x010, 0x00AB);
        image.set(0xFFF, 0xBEEF);
        image
    }

    #[test]
    fn format_names() {
        assert_eq!(OutputFormat::from_str("hexv3"), Ok(OutputFormat::Banked));
        assert_eq!(OutputFormat::from_str("vrlg"), Ok(OutputFormat::Verilog));
        assert!(OutputFormat::from_str("elf").is_err());
        assert_eq!(OutputFormat::Banked.to_string(), "hexv3");
        assert_eq!(OutputFormat::default(), OutputFormat::Bin);

        for format in OutputFormat::iter() {
            assert_eq!(OutputFormat::from_str(&format.to_string()), Ok(format));
        }
    }

    #[test]
    fn flat_formats() {
        let hex = OutputFormat::Hex.render(&sample());
        assert_eq!(hex.len(), MEMORY_WORDS);
        assert_eq!(hex[0], "7001");
        assert_eq!(hex[0x010], "00AB");
        assert_eq!(hex[0xFFF], "BEEF");

        let bin = OutputFormat::Bin.render(&sample());
        assert_eq!(bin.len(), MEMORY_WORDS);
        assert_eq!(bin[0], "0111000000000001");
        assert_eq!(bin[1], "0000000000000000");
    }

    #[test]
    fn banked_format() {
        let lines = OutputFormat::Banked.render(&sample());
        assert_eq!(lines.len(), 1 + MEMORY_WORDS / BANK_WORDS);
        assert_eq!(lines[0], "v3.0 hex words addressed");
        assert_eq!(
            lines[1],
            "000: 7001 0000 0000 0000 0000 0000 0000 0000 0000 0000 0000 0000 0000 0000 0000 0000"
        );
        assert!(lines[2].starts_with("010: 00ab 0000"));
        assert!(lines[256].starts_with("ff0: "));
        assert!(lines[256].ends_with(" beef"));
    }

    #[test]
    fn vhdl_format() {
        assert_eq!(
            OutputFormat::Vhdl.render(&sample()),
            vec![
                "-- program RAM",
                "signal RAM: RAM_ARRAY_16b (0 to 4095) := (",
                "    0 => x\"7001\",",
                "    16 => x\"00AB\",",
                "    4095 => x\"BEEF\",",
                "    others => x\"0000\"",
                ");",
            ]
        );
    }

    #[test]
    fn verilog_format() {
        assert_eq!(
            OutputFormat::Verilog.render(&sample()),
            vec![
                "// program RAM",
                "initial begin",
                "    integer i;",
                "    for(i = 0; i < 4096; i = i + 1) begin",
                "        ram[i] = 16'h0000;",
                "    end",
                "",
                "    ram[0] = 16'h7001;",
                "    ram[16] = 16'h00AB;",
                "    ram[4095] = 16'hBEEF;",
                "end",
            ]
        );
    }

    #[test]
    fn text_has_no_trailing_newline() {
        let text = OutputFormat::Vhdl.render_text(&Image::new());
        assert_eq!(
            text,
            "-- program RAM\nsignal RAM: RAM_ARRAY_16b (0 to 4095) := (\n    others => x\"0000\"\n);"
        );
    }

    #[test]
    fn decode_rejects_bad_input() {
        let mut lines = OutputFormat::Hex.render(&sample());
        assert_eq!(OutputFormat::Hex.decode(&lines), Ok(sample()));

        lines[3] = "00G0".to_owned();
        assert_eq!(
            OutputFormat::Hex.decode(&lines),
            Err(DecodeError::BadWord(4, "00G0".to_owned()))
        );

        lines[3] = "+001".to_owned();
        assert!(OutputFormat::Hex.decode(&lines).is_err());

        lines.pop();
        assert_eq!(
            OutputFormat::Hex.decode(&lines),
            Err(DecodeError::WrongLength(MEMORY_WORDS - 1))
        );

        assert_eq!(
            OutputFormat::Vhdl.decode(&lines),
            Err(DecodeError::Unsupported(OutputFormat::Vhdl))
        );
    }
}
