//! `OS/2` — OS/2 and Windows metrics. Field set is version-gated
//! (versions 0 through 5 each add a tail of fields).

use crate::error::Result;
use crate::macros::bitflags_like;
use crate::stream::Stream;

bitflags_like! {
    /// `fsType` embedding permission bits.
    pub struct EmbeddingPermissions: u16 {
        const RESTRICTED = 1 << 1;
        const PREVIEW_AND_PRINT = 1 << 2;
        const EDITABLE = 1 << 3;
        const NO_SUBSETTING = 1 << 8;
        const BITMAP_EMBEDDING_ONLY = 1 << 9;
    }
}

bitflags_like! {
    /// `fsSelection` style bits.
    pub struct FsSelection: u16 {
        const ITALIC = 1 << 0;
        const UNDERSCORE = 1 << 1;
        const NEGATIVE = 1 << 2;
        const OUTLINED = 1 << 3;
        const STRIKEOUT = 1 << 4;
        const BOLD = 1 << 5;
        const REGULAR = 1 << 6;
        const USE_TYPO_METRICS = 1 << 7;
        const WWS = 1 << 8;
        const OBLIQUE = 1 << 9;
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Os2 {
    pub version: u16,
    pub us_weight_class: u16,
    pub us_width_class: u16,
    pub fs_type: EmbeddingPermissions,
    pub y_subscript_x_size: i16,
    pub y_subscript_y_size: i16,
    pub y_subscript_x_offset: i16,
    pub y_subscript_y_offset: i16,
    pub y_superscript_x_size: i16,
    pub y_superscript_y_size: i16,
    pub y_superscript_x_offset: i16,
    pub y_superscript_y_offset: i16,
    pub y_strikeout_size: i16,
    pub y_strikeout_position: i16,
    pub s_family_class: i16,
    pub panose: [u8; 10],
    pub ul_unicode_range: [u32; 4],
    pub ach_vend_id: [u8; 4],
    pub fs_selection: FsSelection,
    pub us_first_char_index: u16,
    pub us_last_char_index: u16,
    pub s_typo_ascender: i16,
    pub s_typo_descender: i16,
    pub s_typo_line_gap: i16,
    pub us_win_ascent: u16,
    pub us_win_descent: u16,
    pub sx_height: Option<i16>,
    pub s_cap_height: Option<i16>,
}

impl Os2 {
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut s = Stream::new(data);
        let version: u16 = s.read()?;
        s.skip::<i16>()?; // xAvgCharWidth
        let us_weight_class: u16 = s.read()?;
        let us_width_class: u16 = s.read()?;
        let fs_type: u16 = s.read()?;
        let y_subscript_x_size: i16 = s.read()?;
        let y_subscript_y_size: i16 = s.read()?;
        let y_subscript_x_offset: i16 = s.read()?;
        let y_subscript_y_offset: i16 = s.read()?;
        let y_superscript_x_size: i16 = s.read()?;
        let y_superscript_y_size: i16 = s.read()?;
        let y_superscript_x_offset: i16 = s.read()?;
        let y_superscript_y_offset: i16 = s.read()?;
        let y_strikeout_size: i16 = s.read()?;
        let y_strikeout_position: i16 = s.read()?;
        let s_family_class: i16 = s.read()?;
        let mut panose = [0u8; 10];
        for slot in panose.iter_mut() {
            *slot = s.read()?;
        }
        let mut ul_unicode_range = [0u32; 4];
        for slot in ul_unicode_range.iter_mut() {
            *slot = s.read()?;
        }
        let ach_vend_id: [u8; 4] = {
            let bytes = s.read_bytes(4)?;
            bytes.try_into().unwrap()
        };
        let fs_selection: u16 = s.read()?;
        let us_first_char_index: u16 = s.read()?;
        let us_last_char_index: u16 = s.read()?;
        let s_typo_ascender: i16 = s.read()?;
        let s_typo_descender: i16 = s.read()?;
        let s_typo_line_gap: i16 = s.read()?;
        let us_win_ascent: u16 = s.read()?;
        let us_win_descent: u16 = s.read()?;

        let mut sx_height = None;
        let mut s_cap_height = None;
        if version >= 2 {
            s.skip::<u32>()?; // ulCodePageRange1
            s.skip::<u32>()?; // ulCodePageRange2
            sx_height = Some(s.read()?);
            s_cap_height = Some(s.read()?);
            // defaultChar, breakChar, maxContext, and (v5) usLower/UpperOpticalPointSize
            // are not exposed by the facade; best-effort reads stop here.
        }

        Ok(Os2 {
            version,
            us_weight_class,
            us_width_class,
            fs_type: EmbeddingPermissions::from_bits(fs_type),
            y_subscript_x_size,
            y_subscript_y_size,
            y_subscript_x_offset,
            y_subscript_y_offset,
            y_superscript_x_size,
            y_superscript_y_size,
            y_superscript_x_offset,
            y_superscript_y_offset,
            y_strikeout_size,
            y_strikeout_position,
            s_family_class,
            panose,
            ul_unicode_range,
            ach_vend_id,
            fs_selection: FsSelection::from_bits(fs_selection),
            us_first_char_index,
            us_last_char_index,
            s_typo_ascender,
            s_typo_descender,
            s_typo_line_gap,
            us_win_ascent,
            us_win_descent,
            sx_height,
            s_cap_height,
        })
    }

    pub fn is_bold(&self) -> bool {
        self.fs_selection.contains(FsSelection::BOLD)
    }

    pub fn is_italic(&self) -> bool {
        self.fs_selection.contains(FsSelection::ITALIC)
    }

    pub fn is_oblique(&self) -> bool {
        self.fs_selection.contains(FsSelection::OBLIQUE)
    }

    pub fn is_regular(&self) -> bool {
        self.fs_selection.contains(FsSelection::REGULAR)
    }
}
