//! sRGB IEC61966-2.1 display profile (ICC v2.1), built in memory.
//!
//! Colorants are the sRGB primaries chromatically adapted to D50 with the
//! Bradford transform, the media white point is D65, and each channel uses a
//! 1024-entry sampled sRGB transfer curve.

/// Human-readable name, also used as the output condition identifier.
pub const SRGB_DESCRIPTION: &str = "sRGB IEC61966-2.1";

const COPYRIGHT: &str = "No copyright, use freely";
const HEADER_LEN: usize = 128;
const TRC_SAMPLES: usize = 1024;

const D50: [f64; 3] = [0.964_203, 1.0, 0.824_905];
const D65: [f64; 3] = [0.9505, 1.0, 1.0891];
const RED: [f64; 3] = [0.4360747, 0.2225045, 0.0139322];
const GREEN: [f64; 3] = [0.3850649, 0.7168786, 0.0971045];
const BLUE: [f64; 3] = [0.1430804, 0.0606169, 0.7141733];

/// Serialize the sRGB profile.
pub fn srgb_profile() -> Vec<u8> {
    let trc = curve_tag();
    let tags: [(&[u8; 4], Vec<u8>); 7] = [
        (b"desc", description_tag(SRGB_DESCRIPTION)),
        (b"cprt", text_tag(COPYRIGHT)),
        (b"wtpt", xyz_tag(D65)),
        (b"rXYZ", xyz_tag(RED)),
        (b"gXYZ", xyz_tag(GREEN)),
        (b"bXYZ", xyz_tag(BLUE)),
        (b"rTRC", trc),
    ];
    // gTRC and bTRC share the rTRC data block.
    let entry_count = tags.len() + 2;
    let table_len = 4 + entry_count * 12;

    let mut table = Vec::with_capacity(table_len);
    let mut data = Vec::new();
    table.extend_from_slice(&(entry_count as u32).to_be_bytes());

    let mut trc_entry = (0u32, 0u32);
    for (signature, body) in &tags {
        let offset = (HEADER_LEN + table_len + data.len()) as u32;
        let size = body.len() as u32;
        push_entry(&mut table, signature, offset, size);
        if *signature == b"rTRC" {
            trc_entry = (offset, size);
        }
        data.extend_from_slice(body);
        while data.len() % 4 != 0 {
            data.push(0);
        }
    }
    push_entry(&mut table, b"gTRC", trc_entry.0, trc_entry.1);
    push_entry(&mut table, b"bTRC", trc_entry.0, trc_entry.1);

    let total = HEADER_LEN + table.len() + data.len();
    let mut profile = header(total as u32);
    profile.extend_from_slice(&table);
    profile.extend_from_slice(&data);
    profile
}

fn header(size: u32) -> Vec<u8> {
    let mut h = Vec::with_capacity(HEADER_LEN);
    h.extend_from_slice(&size.to_be_bytes());
    h.extend_from_slice(&[0; 4]); // preferred CMM
    h.extend_from_slice(&0x0210_0000u32.to_be_bytes());
    h.extend_from_slice(b"mntr");
    h.extend_from_slice(b"RGB ");
    h.extend_from_slice(b"XYZ ");
    for part in [1998u16, 2, 9, 6, 49, 0] {
        h.extend_from_slice(&part.to_be_bytes());
    }
    h.extend_from_slice(b"acsp");
    h.extend_from_slice(&[0; 4]); // platform
    h.extend_from_slice(&[0; 4]); // flags
    h.extend_from_slice(b"IEC ");
    h.extend_from_slice(b"sRGB");
    h.extend_from_slice(&[0; 8]); // device attributes
    h.extend_from_slice(&0u32.to_be_bytes()); // perceptual
    for v in D50 {
        h.extend_from_slice(&s15_fixed16(v).to_be_bytes());
    }
    h.extend_from_slice(&[0; 4]); // creator
    h.resize(HEADER_LEN, 0);
    h
}

fn push_entry(table: &mut Vec<u8>, signature: &[u8; 4], offset: u32, size: u32) {
    table.extend_from_slice(signature);
    table.extend_from_slice(&offset.to_be_bytes());
    table.extend_from_slice(&size.to_be_bytes());
}

fn s15_fixed16(v: f64) -> i32 {
    (v * 65536.0).round() as i32
}

fn xyz_tag(xyz: [f64; 3]) -> Vec<u8> {
    let mut tag = Vec::with_capacity(20);
    tag.extend_from_slice(b"XYZ ");
    tag.extend_from_slice(&[0; 4]);
    for v in xyz {
        tag.extend_from_slice(&s15_fixed16(v).to_be_bytes());
    }
    tag
}

fn curve_tag() -> Vec<u8> {
    let mut tag = Vec::with_capacity(12 + TRC_SAMPLES * 2);
    tag.extend_from_slice(b"curv");
    tag.extend_from_slice(&[0; 4]);
    tag.extend_from_slice(&(TRC_SAMPLES as u32).to_be_bytes());
    for i in 0..TRC_SAMPLES {
        let v = i as f64 / (TRC_SAMPLES - 1) as f64;
        let linear = if v <= 0.04045 {
            v / 12.92
        } else {
            ((v + 0.055) / 1.055).powf(2.4)
        };
        let sample = (linear * 65535.0).round() as u16;
        tag.extend_from_slice(&sample.to_be_bytes());
    }
    tag
}

fn text_tag(text: &str) -> Vec<u8> {
    let mut tag = Vec::with_capacity(9 + text.len());
    tag.extend_from_slice(b"text");
    tag.extend_from_slice(&[0; 4]);
    tag.extend_from_slice(text.as_bytes());
    tag.push(0);
    tag
}

// textDescriptionType: ASCII part, empty Unicode and ScriptCode parts.
fn description_tag(text: &str) -> Vec<u8> {
    let mut tag = Vec::new();
    tag.extend_from_slice(b"desc");
    tag.extend_from_slice(&[0; 4]);
    tag.extend_from_slice(&(text.len() as u32 + 1).to_be_bytes());
    tag.extend_from_slice(text.as_bytes());
    tag.push(0);
    tag.extend_from_slice(&[0; 4]); // unicode language code
    tag.extend_from_slice(&[0; 4]); // unicode count
    tag.extend_from_slice(&[0; 2]); // scriptcode code
    tag.push(0); // scriptcode count
    tag.extend_from_slice(&[0; 67]);
    tag
}
