use crate::libs::graph::{non_negative, read_i32, write_i32, ContigId, GraphError};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Write groups as `i32` group count, then per group `i32` size and the member ids.
///
/// ```
/// use std::collections::BTreeSet;
/// use std::io::Cursor;
///
/// let groups = vec![BTreeSet::from([0, 1, 2]), BTreeSet::from([5])];
/// let mut buf = vec![];
/// hmr::libs::group::write_groups(&mut buf, &groups).unwrap();
/// assert_eq!(buf.len(), 4 + (4 + 3 * 4) + (4 + 4));
///
/// let loaded = hmr::libs::group::read_groups(&mut Cursor::new(buf)).unwrap();
/// assert_eq!(loaded, groups);
/// ```
pub fn write_groups<W: Write>(writer: &mut W, groups: &[BTreeSet<ContigId>]) -> std::io::Result<()> {
    write_i32(writer, "group count", groups.len())?;
    for group in groups {
        write_i32(writer, "group size", group.len())?;
        for &id in group {
            write_i32(writer, "contig id", id)?;
        }
    }
    Ok(())
}

pub fn read_groups<R: Read>(reader: &mut R) -> Result<Vec<BTreeSet<ContigId>>, GraphError> {
    let count = non_negative("group count", 0, read_i32(reader)?)?;
    let mut groups = Vec::with_capacity(count.min(1 << 16));
    for index in 0..count {
        let size = non_negative("group size", index, read_i32(reader)?)?;
        let mut group = BTreeSet::new();
        for _ in 0..size {
            group.insert(non_negative("contig id", index, read_i32(reader)?)?);
        }
        groups.push(group);
    }
    Ok(groups)
}

pub fn save_groups<P: AsRef<Path>>(path: P, groups: &[BTreeSet<ContigId>]) -> std::io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_groups(&mut writer, groups)?;
    writer.flush()
}

pub fn load_groups<P: AsRef<Path>>(path: P) -> Result<Vec<BTreeSet<ContigId>>, GraphError> {
    read_groups(&mut BufReader::new(File::open(path)?))
}
