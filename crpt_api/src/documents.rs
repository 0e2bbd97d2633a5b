use serde::Deserialize;
use serde::Serialize;

/// Goods-introduction document registered with the ISMP service
///
/// Field names on the wire are camelCase, matching the documents/create
/// endpoint schema.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub participant_inn: String,
    pub doc_id: String,
    pub doc_status: String,
    pub doc_type: String,
    pub import_request: bool,
    pub owner_inn: String,
    pub participant_inn_inner: String,
    pub producer_inn: String,
    pub production_date: String,
    pub production_type: String,
    pub products: Vec<Product>,
    pub reg_date: String,
    pub reg_number: String,
}

/// Single product line within a document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub certificate_document: String,
    pub certificate_document_date: String,
    pub certificate_document_number: String,
    pub owner_inn: String,
    pub producer_inn: String,
    pub production_date: String,
    pub tnved_code: String,
    pub uit_code: String,
    pub uitu_code: String,
}

/// Request body sent to the documents/create endpoint: the document under
/// `description` with the detached signature as a sibling field
#[derive(Debug, Serialize)]
pub struct SubmissionRequest<'a> {
    pub description: &'a Document,
    pub signature: &'a str,
}

impl Document {
    /// A populated goods-introduction document, useful for demos and tests
    pub fn sample() -> Self {
        Self {
            participant_inn: "1234567890".to_string(),
            doc_id: "docId".to_string(),
            doc_status: "status".to_string(),
            doc_type: "LP_INTRODUCE_GOODS".to_string(),
            import_request: true,
            owner_inn: "ownerInn".to_string(),
            participant_inn_inner: "participantInnInner".to_string(),
            producer_inn: "producerInn".to_string(),
            production_date: "2020-01-23".to_string(),
            production_type: "productionType".to_string(),
            products: vec![Product {
                certificate_document: "certDoc".to_string(),
                certificate_document_date: "2020-01-23".to_string(),
                certificate_document_number: "certDocNum".to_string(),
                owner_inn: "ownerInn".to_string(),
                producer_inn: "producerInn".to_string(),
                production_date: "2020-01-23".to_string(),
                tnved_code: "tnvedCode".to_string(),
                uit_code: "uitCode".to_string(),
                uitu_code: "uituCode".to_string(),
            }],
            reg_date: "2020-01-23".to_string(),
            reg_number: "regNumber".to_string(),
        }
    }
}
