pub const GO_TSV_HEADER: [&str; 4] = ["GeneID", "GO_Type", "GO_ID", "GO_Description"];

pub const GENE_TSV_HEADER: [&str; 8] = [
    "GeneID",
    "GeneName",
    "Chrom",
    "Start",
    "End",
    "Strand",
    "Type",
    "Description",
];

/// Descriptive pair shared by a term's primary and alias identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermInfo {
    pub namespace: String,
    pub name: String,
}

impl TermInfo {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

/// GO aspect codes as used in column 9 of a GAF file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Aspect {
    MolecularFunction,
    BiologicalProcess,
    CellularComponent,
}

impl Aspect {
    pub const ALL: [Aspect; 3] = [
        Aspect::MolecularFunction,
        Aspect::BiologicalProcess,
        Aspect::CellularComponent,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Aspect::MolecularFunction => "F",
            Aspect::BiologicalProcess => "P",
            Aspect::CellularComponent => "C",
        }
    }

    pub fn namespace(&self) -> &'static str {
        match self {
            Aspect::MolecularFunction => "molecular_function",
            Aspect::BiologicalProcess => "biological_process",
            Aspect::CellularComponent => "cellular_component",
        }
    }
}

/// One line of the long-format GO table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationRow {
    pub gene_id: String,
    pub go_type: String,
    pub go_id: String,
    pub description: String,
}

impl AnnotationRow {
    pub fn fields(&self) -> [&str; 4] {
        [
            &self.gene_id,
            &self.go_type,
            &self.go_id,
            &self.description,
        ]
    }
}

/// One extracted GFF3 feature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneRow {
    pub gene_id: String,
    pub gene_name: String,
    pub chrom: String,
    pub start: String,
    pub end: String,
    pub strand: String,
    pub feature_type: String,
    pub description: String,
}

impl GeneRow {
    pub fn fields(&self) -> [&str; 8] {
        [
            &self.gene_id,
            &self.gene_name,
            &self.chrom,
            &self.start,
            &self.end,
            &self.strand,
            &self.feature_type,
            &self.description,
        ]
    }
}
