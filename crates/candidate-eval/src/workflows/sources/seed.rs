use super::domain::{PublicationSource, SourceId};

/// `(id, name, category, points, description)` rows of the built-in prestige table.
#[rustfmt::skip]
const DEFAULT_TABLE: &[(&str, &str, &str, u32, Option<&str>)] = &[
    ("1", "Nature", "Top-tier Journal", 25, Some("Multidisciplinary science journal")),
    ("2", "Science", "Top-tier Journal", 25, Some("Premier scientific journal")),
    ("3", "Cell", "Top-tier Journal", 24, Some("Leading life sciences journal")),
    ("4", "NEJM", "Top-tier Journal", 24, Some("New England Journal of Medicine")),
    ("5", "IEEE Transactions on Pattern Analysis and Machine Intelligence", "IEEE Tier 1", 22, None),
    ("6", "IEEE Transactions on Information Theory", "IEEE Tier 1", 21, None),
    ("7", "IEEE Transactions on Signal Processing", "IEEE Tier 1", 20, None),
    ("8", "IEEE Transactions on Computers", "IEEE Tier 1", 20, None),
    ("9", "ACM Transactions on Graphics", "ACM Tier 1", 22, None),
    ("10", "ACM Computing Surveys", "ACM Tier 1", 21, None),
    ("11", "Communications of the ACM", "ACM Tier 1", 19, None),
    ("12", "NeurIPS", "Top Conference", 20, Some("Neural Information Processing Systems")),
    ("13", "ICML", "Top Conference", 20, Some("International Conference on Machine Learning")),
    ("14", "ICCV", "Top Conference", 19, Some("International Conference on Computer Vision")),
    ("15", "CVPR", "Top Conference", 19, Some("Computer Vision and Pattern Recognition")),
    ("16", "SIGCOMM", "Top Conference", 18, None),
    ("17", "SIGMOD", "Top Conference", 18, None),
    ("18", "Journal of Machine Learning Research", "High-impact Journal", 18, None),
    ("19", "Artificial Intelligence", "High-impact Journal", 17, None),
    ("20", "Pattern Recognition", "High-impact Journal", 16, None),
    ("21", "Computer Vision and Image Understanding", "High-impact Journal", 15, None),
    ("22", "Information Sciences", "High-impact Journal", 14, None),
    ("23", "ECCV", "Regional Conference", 15, Some("European Conference on Computer Vision")),
    ("24", "AAAI", "Regional Conference", 14, None),
    ("25", "IJCAI", "Regional Conference", 14, None),
    ("26", "ICASSP", "Regional Conference", 12, None),
    ("27", "ICLR", "Regional Conference", 17, None),
    ("28", "Expert Systems with Applications", "Standard Journal", 10, None),
    ("29", "Neurocomputing", "Standard Journal", 9, None),
    ("30", "Applied Soft Computing", "Standard Journal", 8, None),
    ("31", "Knowledge-Based Systems", "Standard Journal", 10, None),
    ("32", "Workshop Paper", "Workshop", 5, None),
    ("33", "Local Conference", "Local Conference", 6, None),
    ("34", "Symposium", "Symposium", 7, None),
    ("35", "ArXiv Preprint", "Preprint", 2, None),
    ("36", "Technical Report", "Report", 3, None),
    ("37", "Book Chapter", "Book", 8, None),
    ("38", "Patent", "Patent", 12, None),
    ("39", "Other", "Other", 1, None),
];

/// The table used when nothing has been persisted under `publicationSources`.
pub fn default_sources() -> Vec<PublicationSource> {
    DEFAULT_TABLE
        .iter()
        .map(|(id, name, category, points, description)| PublicationSource {
            id: SourceId::from(*id),
            name: (*name).to_string(),
            category: (*category).to_string(),
            points: *points,
            description: description.map(str::to_string),
        })
        .collect()
}
