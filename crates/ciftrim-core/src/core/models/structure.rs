use nalgebra::Point3;

#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    pub name: String,               // Atom name from the source file (e.g. "CA")
    pub element: String,            // Element symbol, may be empty when absent
    pub position: Point3<f64>,      // Cartesian coordinates in Angstroms
    pub occupancy: f64,             // Defaults to 1.0 when absent
    pub b_factor: f64,              // Carries the per-residue pLDDT in AlphaFold output
}

impl Atom {
    pub fn new(name: &str, element: &str, position: Point3<f64>) -> Self {
        Self {
            name: name.to_string(),
            element: element.to_string(),
            position,
            occupancy: 1.0,
            b_factor: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Residue {
    pub seq_id: i32, // 1-based residue sequence number from the source file
    pub name: String,
    pub(crate) atoms: Vec<Atom>,
}

impl Residue {
    pub(crate) fn new(seq_id: i32, name: &str) -> Self {
        Self {
            seq_id,
            name: name.to_string(),
            atoms: Vec::new(),
        }
    }

    pub(crate) fn add_atom(&mut self, atom: Atom) {
        self.atoms.push(atom);
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Chain {
    pub id: String,
    pub(crate) residues: Vec<Residue>,
}

impl Chain {
    pub(crate) fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            residues: Vec::new(),
        }
    }

    pub(crate) fn add_residue(&mut self, residue: Residue) {
        self.residues.push(residue);
    }

    pub fn residues(&self) -> &[Residue] {
        &self.residues
    }
}

/// Atom-level view of one structure file, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Structure {
    pub(crate) chains: Vec<Chain>,
}

impl Structure {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add_chain(&mut self, chain: Chain) {
        self.chains.push(chain);
    }

    pub fn chains(&self) -> &[Chain] {
        &self.chains
    }

    pub fn atom_count(&self) -> usize {
        self.chains
            .iter()
            .flat_map(|c| c.residues.iter())
            .map(|r| r.atoms.len())
            .sum()
    }
}
