use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Dense contig index, `0..N`.
pub type ContigId = usize;

#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid contig name at record {index}: {source}")]
    InvalidName {
        index: usize,
        source: std::string::FromUtf8Error,
    },

    #[error("negative value {value} for {field} at record {index}")]
    NegativeValue {
        field: &'static str,
        index: usize,
        value: i64,
    },

    #[error("edge ({start}, {end}) references a contig outside 0..{contigs}")]
    ContigOutOfRange {
        start: usize,
        end: usize,
        contigs: usize,
    },

    #[error("edge ({start}, {end}) has invalid weight {weight}")]
    InvalidWeight { start: usize, end: usize, weight: f64 },
}

/// An assembled fragment, a node of the contact graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contig {
    pub name: String,
    pub length: u64,
}

impl Contig {
    pub fn new(name: &str, length: u64) -> Self {
        Self {
            name: name.to_string(),
            length,
        }
    }
}

/// One entry of a contig's adjacency list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContigEdge {
    pub id: ContigId,
    pub weight: f64,
}

/// A raw undirected edge, as stored in `.hmr_edge` files.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeRecord {
    pub start: ContigId,
    pub end: ContigId,
    pub weight: f64,
}

impl EdgeRecord {
    pub fn new(start: ContigId, end: ContigId, weight: f64) -> Self {
        Self { start, end, weight }
    }
}

/// Contigs plus a symmetric weighted adjacency list.
///
/// The graph is read-only once built; every partition trial borrows it.
#[derive(Debug, Clone)]
pub struct ContigGraph {
    contigs: Vec<Contig>,
    edges: Vec<Vec<ContigEdge>>,
}

impl ContigGraph {
    pub fn new(contigs: Vec<Contig>) -> Self {
        let edges = vec![Vec::new(); contigs.len()];
        Self { contigs, edges }
    }

    /// Build a graph and insert every record in order.
    ///
    /// ```
    /// use hmr::libs::graph::{Contig, ContigGraph, EdgeRecord};
    ///
    /// let contigs = vec![Contig::new("a", 10), Contig::new("b", 20)];
    /// let graph = ContigGraph::from_records(contigs, &[EdgeRecord::new(0, 1, 3.0)]).unwrap();
    /// assert_eq!(graph.edges(1)[0].id, 0);
    ///
    /// let contigs = vec![Contig::new("a", 10)];
    /// assert!(ContigGraph::from_records(contigs, &[EdgeRecord::new(0, 5, 1.0)]).is_err());
    /// ```
    pub fn from_records(contigs: Vec<Contig>, records: &[EdgeRecord]) -> Result<Self, GraphError> {
        let mut graph = Self::new(contigs);
        for record in records {
            graph.add_edge(record.start, record.end, record.weight)?;
        }
        Ok(graph)
    }

    /// Insert `(start, end, weight)` into both adjacency lists.
    ///
    /// Self-edges are silently dropped.
    pub fn add_edge(&mut self, start: ContigId, end: ContigId, weight: f64) -> Result<(), GraphError> {
        let contigs = self.contigs.len();
        if start >= contigs || end >= contigs {
            return Err(GraphError::ContigOutOfRange { start, end, contigs });
        }
        if !weight.is_finite() || weight < 0.0 {
            return Err(GraphError::InvalidWeight { start, end, weight });
        }
        if start == end {
            return Ok(());
        }
        self.edges[start].push(ContigEdge { id: end, weight });
        self.edges[end].push(ContigEdge { id: start, weight });
        Ok(())
    }

    /// Number of contigs.
    pub fn len(&self) -> usize {
        self.contigs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contigs.is_empty()
    }

    pub fn contig(&self, id: ContigId) -> &Contig {
        &self.contigs[id]
    }

    /// Adjacency list of a contig, in insertion order.
    pub fn edges(&self, id: ContigId) -> &[ContigEdge] {
        &self.edges[id]
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.edges.iter().map(|list| list.len()).sum::<usize>() / 2
    }

    /// Load a `.hmr_contig` and a `.hmr_edge` file.
    pub fn load<P: AsRef<Path>, Q: AsRef<Path>>(contig_path: P, edge_path: Q) -> Result<Self, GraphError> {
        let contigs = read_contigs(&mut BufReader::new(File::open(contig_path)?))?;
        let records = read_edges(&mut BufReader::new(File::open(edge_path)?))?;
        Self::from_records(contigs, &records)
    }
}

//----------------------------
// Binary formats
//----------------------------
pub(crate) fn read_i32<R: Read>(reader: &mut R) -> std::io::Result<i32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(i32::from_le_bytes(buf))
}

pub(crate) fn write_i32<W: Write, T>(writer: &mut W, field: &str, value: T) -> std::io::Result<()>
where
    T: Copy + std::fmt::Display,
    i32: TryFrom<T>,
{
    let value = i32::try_from(value).map_err(|_| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("{} {} does not fit in i32", field, value),
        )
    })?;
    writer.write_all(&value.to_le_bytes())
}

fn read_u64<R: Read>(reader: &mut R) -> std::io::Result<u64> {
    let mut buf = [0u8; 8];
    reader.read_exact(&mut buf)?;
    Ok(u64::from_le_bytes(buf))
}

fn read_f64<R: Read>(reader: &mut R) -> std::io::Result<f64> {
    let mut buf = [0u8; 8];
    reader.read_exact(&mut buf)?;
    Ok(f64::from_le_bytes(buf))
}

pub(crate) fn non_negative(field: &'static str, index: usize, value: i32) -> Result<usize, GraphError> {
    usize::try_from(value).map_err(|_| GraphError::NegativeValue {
        field,
        index,
        value: value as i64,
    })
}

/// Read a contig table: `u64` count, then `i32` name length, name bytes, `i32` length.
pub fn read_contigs<R: Read>(reader: &mut R) -> Result<Vec<Contig>, GraphError> {
    let count = read_u64(reader)? as usize;
    let mut contigs = Vec::with_capacity(count.min(1 << 20));
    for index in 0..count {
        let name_size = non_negative("name length", index, read_i32(reader)?)?;
        let mut name_buf = Vec::new();
        reader.by_ref().take(name_size as u64).read_to_end(&mut name_buf)?;
        if name_buf.len() != name_size {
            return Err(GraphError::Io(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                format!("contig {} name ends after {} of {} bytes", index, name_buf.len(), name_size),
            )));
        }
        let name =
            String::from_utf8(name_buf).map_err(|source| GraphError::InvalidName { index, source })?;
        let length = non_negative("contig length", index, read_i32(reader)?)?;
        contigs.push(Contig {
            name,
            length: length as u64,
        });
    }
    Ok(contigs)
}

pub fn write_contigs<W: Write>(writer: &mut W, contigs: &[Contig]) -> std::io::Result<()> {
    writer.write_all(&(contigs.len() as u64).to_le_bytes())?;
    for contig in contigs {
        write_i32(writer, "name length", contig.name.len())?;
        writer.write_all(contig.name.as_bytes())?;
        write_i32(writer, "contig length", contig.length)?;
    }
    Ok(())
}

/// Read edge records: `u64` count, then `i32` start, `i32` end, `f64` weight.
pub fn read_edges<R: Read>(reader: &mut R) -> Result<Vec<EdgeRecord>, GraphError> {
    let count = read_u64(reader)? as usize;
    let mut records = Vec::with_capacity(count.min(1 << 20));
    for index in 0..count {
        let start = non_negative("edge start", index, read_i32(reader)?)?;
        let end = non_negative("edge end", index, read_i32(reader)?)?;
        let weight = read_f64(reader)?;
        records.push(EdgeRecord { start, end, weight });
    }
    Ok(records)
}

pub fn write_edges<W: Write>(writer: &mut W, records: &[EdgeRecord]) -> std::io::Result<()> {
    writer.write_all(&(records.len() as u64).to_le_bytes())?;
    for record in records {
        write_i32(writer, "edge start", record.start)?;
        write_i32(writer, "edge end", record.end)?;
        writer.write_all(&record.weight.to_le_bytes())?;
    }
    Ok(())
}

/// Write both graph files at once, e.g. for fixtures.
pub fn save_graph<P: AsRef<Path>, Q: AsRef<Path>>(
    contig_path: P,
    edge_path: Q,
    contigs: &[Contig],
    records: &[EdgeRecord],
) -> std::io::Result<()> {
    let mut writer = BufWriter::new(File::create(contig_path)?);
    write_contigs(&mut writer, contigs)?;
    writer.flush()?;

    let mut writer = BufWriter::new(File::create(edge_path)?);
    write_edges(&mut writer, records)?;
    writer.flush()
}
