use crate::core::models::structure::{Atom, Residue, Structure};
use std::io::{self, Write};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PdbError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Which chains of a structure are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainPolicy {
    /// Keep only the first chain encountered in the file. Predicted
    /// structures carry one biologically relevant chain; anything after it is
    /// dropped.
    FirstOnly,
    /// Keep every chain.
    All,
}

/// Stateless selection criteria applied while writing.
///
/// A residue is accepted when its 1-based sequence number, converted to
/// 0-based, falls within `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub chains: ChainPolicy,
    pub start: usize,
    pub end: usize,
}

impl Selection {
    pub fn new(chains: ChainPolicy, start: usize, end: usize) -> Self {
        Self { chains, start, end }
    }

    fn accepts_residue(&self, residue: &Residue) -> bool {
        let index = i64::from(residue.seq_id) - 1;
        index >= self.start as i64 && index < self.end as i64
    }
}

/// Writes the selected part of `structure` as PDB records.
///
/// Emits ATOM records with a TER after each written chain and a final END.
/// Serial numbers are renumbered from 1 in output order.
pub fn write_structure<W: Write>(
    mut writer: W,
    structure: &Structure,
    selection: &Selection,
) -> Result<(), PdbError> {
    let mut serial = 1usize;

    let chains: &[_] = match selection.chains {
        ChainPolicy::FirstOnly => &structure.chains()[..structure.chains().len().min(1)],
        ChainPolicy::All => structure.chains(),
    };

    for chain in chains {
        let mut last_written: Option<&Residue> = None;
        for residue in chain.residues() {
            if !selection.accepts_residue(residue) {
                continue;
            }
            for atom in residue.atoms() {
                write_atom_record(&mut writer, serial, atom, residue, &chain.id)?;
                serial += 1;
            }
            last_written = Some(residue);
        }
        if let Some(residue) = last_written {
            write_ter_record(&mut writer, serial, residue, &chain.id)?;
            serial += 1;
        }
    }

    writeln!(writer, "END   ")?;
    Ok(())
}

fn write_atom_record<W: Write>(
    writer: &mut W,
    serial: usize,
    atom: &Atom,
    residue: &Residue,
    chain_id: &str,
) -> Result<(), PdbError> {
    // PDB atom names start in column 14 unless they occupy all four columns.
    let atom_name = if atom.name.len() >= 4 {
        format!("{:<4}", &atom.name[0..4])
    } else {
        format!(" {:<3}", atom.name)
    };

    let res_name = if residue.name.len() > 3 {
        &residue.name[0..3]
    } else {
        &residue.name
    };

    writeln!(
        writer,
        "{:6}{:5} {:4}{:1}{:3} {:1}{:4}{:1}   {:8.3}{:8.3}{:8.3}{:6.2}{:6.2}          {:>2}",
        "ATOM  ",
        serial % 100000,
        atom_name,
        ' ',
        res_name,
        chain_id.chars().next().unwrap_or(' '),
        residue.seq_id % 10000,
        ' ',
        atom.position.x,
        atom.position.y,
        atom.position.z,
        atom.occupancy,
        atom.b_factor,
        atom.element.to_uppercase()
    )?;
    Ok(())
}

fn write_ter_record<W: Write>(
    writer: &mut W,
    serial: usize,
    residue: &Residue,
    chain_id: &str,
) -> Result<(), PdbError> {
    let res_name = if residue.name.len() > 3 {
        &residue.name[0..3]
    } else {
        &residue.name
    };
    writeln!(
        writer,
        "TER   {:5}      {:3} {:1}{:4}{:1}",
        serial % 100000,
        res_name,
        chain_id.chars().next().unwrap_or(' '),
        residue.seq_id % 10000,
        ' '
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::structure::{Atom, Chain, Residue, Structure};
    use nalgebra::Point3;

    fn residue_with_ca(seq_id: i32, name: &str, b_factor: f64) -> Residue {
        let mut residue = Residue::new(seq_id, name);
        let mut atom = Atom::new("CA", "C", Point3::new(seq_id as f64, 0.5, -1.25));
        atom.b_factor = b_factor;
        residue.add_atom(atom);
        residue
    }

    fn two_chain_structure() -> Structure {
        let mut structure = Structure::new();

        let mut a = Chain::new("A");
        for (i, name) in [(1, "MET"), (2, "LYS"), (3, "THR"), (4, "ALA")] {
            a.add_residue(residue_with_ca(i, name, 90.0));
        }
        structure.add_chain(a);

        let mut b = Chain::new("B");
        b.add_residue(residue_with_ca(1, "GLY", 75.0));
        structure.add_chain(b);

        structure
    }

    #[test]
    fn first_only_policy_drops_later_chains() {
        let structure = two_chain_structure();
        let selection = Selection::new(ChainPolicy::FirstOnly, 0, 4);

        let mut buffer = Vec::new();
        write_structure(&mut buffer, &structure, &selection).unwrap();
        let output = String::from_utf8(buffer).unwrap();

        assert!(!output.contains("GLY"));
        assert_eq!(output.lines().filter(|l| l.starts_with("ATOM")).count(), 4);
        assert_eq!(output.lines().filter(|l| l.starts_with("TER")).count(), 1);
    }

    #[test]
    fn all_policy_writes_every_chain() {
        let structure = two_chain_structure();
        let selection = Selection::new(ChainPolicy::All, 0, 4);

        let mut buffer = Vec::new();
        write_structure(&mut buffer, &structure, &selection).unwrap();
        let output = String::from_utf8(buffer).unwrap();

        assert!(output.contains("GLY"));
        assert_eq!(output.lines().filter(|l| l.starts_with("TER")).count(), 2);
    }

    #[test]
    fn residue_window_filters_by_zero_based_index() {
        let structure = two_chain_structure();
        // [1, 3) keeps residues with seq_id 2 and 3 only.
        let selection = Selection::new(ChainPolicy::FirstOnly, 1, 3);

        let mut buffer = Vec::new();
        write_structure(&mut buffer, &structure, &selection).unwrap();
        let output = String::from_utf8(buffer).unwrap();

        assert!(!output.contains("MET"));
        assert!(output.contains("LYS"));
        assert!(output.contains("THR"));
        assert!(!output.contains("ALA"));
    }

    #[test]
    fn empty_selection_still_terminates_the_file() {
        let structure = two_chain_structure();
        let selection = Selection::new(ChainPolicy::FirstOnly, 0, 0);

        let mut buffer = Vec::new();
        write_structure(&mut buffer, &structure, &selection).unwrap();
        let output = String::from_utf8(buffer).unwrap();

        assert_eq!(output.lines().count(), 1);
        assert_eq!(output.lines().next().unwrap(), "END   ");
    }

    #[test]
    fn atom_record_layout_matches_fixed_columns() {
        let structure = two_chain_structure();
        let selection = Selection::new(ChainPolicy::FirstOnly, 0, 1);

        let mut buffer = Vec::new();
        write_structure(&mut buffer, &structure, &selection).unwrap();
        let output = String::from_utf8(buffer).unwrap();
        let line = output.lines().next().unwrap();

        assert_eq!(&line[0..6], "ATOM  ");
        assert_eq!(line[6..11].trim(), "1");
        assert_eq!(line[12..16].trim(), "CA");
        assert_eq!(line[17..20].trim(), "MET");
        assert_eq!(line.chars().nth(21).unwrap(), 'A');
        assert_eq!(line[22..26].trim(), "1");
        assert_eq!(line[30..38].trim(), "1.000");
        assert_eq!(line[60..66].trim(), "90.00");
        assert_eq!(line[76..78].trim(), "C");
    }

    #[test]
    fn serials_renumber_sequentially_across_chains() {
        let structure = two_chain_structure();
        let selection = Selection::new(ChainPolicy::All, 0, 4);

        let mut buffer = Vec::new();
        write_structure(&mut buffer, &structure, &selection).unwrap();
        let output = String::from_utf8(buffer).unwrap();

        let serials: Vec<usize> = output
            .lines()
            .filter(|l| l.starts_with("ATOM") || l.starts_with("TER"))
            .map(|l| l[6..11].trim().parse().unwrap())
            .collect();
        assert_eq!(serials, vec![1, 2, 3, 4, 5, 6, 7]);
    }
}
