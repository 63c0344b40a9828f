//! Typed requests and responses.
//!
//! Payloads are decoded once at the dispatch boundary; everything past it
//! works with these enums.

use crate::codec::{CodecError, Decoder, Encoder, Result};
use crate::selector::Selector;
use bytes::Bytes;
use vecgate_engine::{LabeledReference, SearchHit};
use vecgate_fixed::I256;
use vecgate_registry::{Domain, GlobalId, Tag};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Lookup {
        global_id: GlobalId,
    },
    Register {
        domain: Domain,
        vector: Vec<i128>,
        tags: Vec<Tag>,
        ttl_blocks: u64,
    },
    Classify {
        query: Vec<i128>,
        refs: Vec<LabeledReference>,
        k: u32,
    },
    ClusterAssign {
        query: Vec<i128>,
        centroids: Vec<GlobalId>,
    },
    AnomalyScore {
        domain: Domain,
        query: Vec<i128>,
    },
    SimilarityGate {
        a: Vec<i128>,
        b: Vec<i128>,
        threshold: I256,
    },
    GlobalSearch {
        query: Vec<i128>,
        k: u32,
    },
    Sweep {
        domain: Domain,
        max_count: u32,
    },
    Calibrate {
        domain: Domain,
        vector: Vec<i128>,
    },
}

impl Request {
    pub fn selector(&self) -> Selector {
        match self {
            Request::Lookup { .. } => Selector::Lookup,
            Request::Register { .. } => Selector::Register,
            Request::Classify { .. } => Selector::Classify,
            Request::ClusterAssign { .. } => Selector::ClusterAssign,
            Request::AnomalyScore { .. } => Selector::AnomalyScore,
            Request::SimilarityGate { .. } => Selector::SimilarityGate,
            Request::GlobalSearch { .. } => Selector::GlobalSearch,
            Request::Sweep { .. } => Selector::Sweep,
            Request::Calibrate { .. } => Selector::Calibrate,
        }
    }

    /// Decode a payload for `selector`. The whole payload must be consumed.
    pub fn decode(selector: Selector, payload: &[u8]) -> Result<Self> {
        let mut d = Decoder::new(payload);
        let request = match selector {
            Selector::Lookup => Request::Lookup {
                global_id: d.u64()?,
            },
            Selector::Register => Request::Register {
                domain: d.domain()?,
                vector: d.vector()?,
                tags: d.tags()?,
                ttl_blocks: d.u64()?,
            },
            Selector::Classify => Request::Classify {
                query: d.vector()?,
                refs: d
                    .labeled()?
                    .into_iter()
                    .map(|(id, label)| LabeledReference::new(id, label))
                    .collect(),
                k: d.u32()?,
            },
            Selector::ClusterAssign => Request::ClusterAssign {
                query: d.vector()?,
                centroids: d.ids()?,
            },
            Selector::AnomalyScore => Request::AnomalyScore {
                domain: d.domain()?,
                query: d.vector()?,
            },
            Selector::SimilarityGate => Request::SimilarityGate {
                a: d.vector()?,
                b: d.vector()?,
                threshold: d.word()?,
            },
            Selector::GlobalSearch => Request::GlobalSearch {
                query: d.vector()?,
                k: d.u32()?,
            },
            Selector::Sweep => Request::Sweep {
                domain: d.domain()?,
                max_count: d.u32()?,
            },
            Selector::Calibrate => Request::Calibrate {
                domain: d.domain()?,
                vector: d.vector()?,
            },
        };
        d.finish()?;
        Ok(request)
    }

    pub fn encode(&self) -> Bytes {
        let mut e = Encoder::new();
        match self {
            Request::Lookup { global_id } => {
                e.u64(*global_id);
            }
            Request::Register {
                domain,
                vector,
                tags,
                ttl_blocks,
            } => {
                e.domain(*domain).vector(vector).tags(tags).u64(*ttl_blocks);
            }
            Request::Classify { query, refs, k } => {
                let pairs: Vec<(u64, u32)> =
                    refs.iter().map(|r| (r.global_id, r.label)).collect();
                e.vector(query).labeled(&pairs).u32(*k);
            }
            Request::ClusterAssign { query, centroids } => {
                e.vector(query).ids(centroids);
            }
            Request::AnomalyScore { domain, query } => {
                e.domain(*domain).vector(query);
            }
            Request::SimilarityGate { a, b, threshold } => {
                e.vector(a).vector(b).word(*threshold);
            }
            Request::GlobalSearch { query, k } => {
                e.vector(query).u32(*k);
            }
            Request::Sweep { domain, max_count } => {
                e.domain(*domain).u32(*max_count);
            }
            Request::Calibrate { domain, vector } => {
                e.domain(*domain).vector(vector);
            }
        }
        e.finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// `vector` is empty when the id is absent.
    Lookup { exists: bool, vector: Vec<i128> },
    Register {
        global_id: GlobalId,
        remaining_quota: u128,
    },
    Classify { label: u32, confidence: I256 },
    ClusterAssign { centroid_id: GlobalId, distance: I256 },
    AnomalyScore { score: I256, is_anomaly: bool },
    SimilarityGate { passed: bool, similarity: I256 },
    GlobalSearch { hits: Vec<SearchHit> },
    Sweep { removed: u32, credited: u128 },
    Calibrate { observations: u64 },
}

impl Response {
    pub fn selector(&self) -> Selector {
        match self {
            Response::Lookup { .. } => Selector::Lookup,
            Response::Register { .. } => Selector::Register,
            Response::Classify { .. } => Selector::Classify,
            Response::ClusterAssign { .. } => Selector::ClusterAssign,
            Response::AnomalyScore { .. } => Selector::AnomalyScore,
            Response::SimilarityGate { .. } => Selector::SimilarityGate,
            Response::GlobalSearch { .. } => Selector::GlobalSearch,
            Response::Sweep { .. } => Selector::Sweep,
            Response::Calibrate { .. } => Selector::Calibrate,
        }
    }

    pub fn encode(&self) -> Bytes {
        let mut e = Encoder::new();
        match self {
            Response::Lookup { exists, vector } => {
                e.bool(*exists).vector(vector);
            }
            Response::Register {
                global_id,
                remaining_quota,
            } => {
                e.u64(*global_id).u128_word(*remaining_quota);
            }
            Response::Classify { label, confidence } => {
                e.u32(*label).word(*confidence);
            }
            Response::ClusterAssign {
                centroid_id,
                distance,
            } => {
                e.u64(*centroid_id).word(*distance);
            }
            Response::AnomalyScore { score, is_anomaly } => {
                e.word(*score).bool(*is_anomaly);
            }
            Response::SimilarityGate { passed, similarity } => {
                e.bool(*passed).word(*similarity);
            }
            Response::GlobalSearch { hits } => {
                let ids: Vec<u64> = hits.iter().map(|h| h.global_id).collect();
                let scores: Vec<I256> = hits.iter().map(|h| h.score).collect();
                let domains: Vec<Domain> = hits.iter().map(|h| h.domain).collect();
                e.ids(&ids).words(&scores).domains(&domains);
            }
            Response::Sweep { removed, credited } => {
                e.u32(*removed).u128_word(*credited);
            }
            Response::Calibrate { observations } => {
                e.u64(*observations);
            }
        }
        e.finish()
    }

    /// Decode a response produced for `selector`. Used by callers of the gateway.
    pub fn decode(selector: Selector, output: &[u8]) -> Result<Self> {
        let mut d = Decoder::new(output);
        let response = match selector {
            Selector::Lookup => Response::Lookup {
                exists: d.bool()?,
                vector: d.vector()?,
            },
            Selector::Register => Response::Register {
                global_id: d.u64()?,
                remaining_quota: d.u128_word()?,
            },
            Selector::Classify => Response::Classify {
                label: d.u32()?,
                confidence: d.word()?,
            },
            Selector::ClusterAssign => Response::ClusterAssign {
                centroid_id: d.u64()?,
                distance: d.word()?,
            },
            Selector::AnomalyScore => Response::AnomalyScore {
                score: d.word()?,
                is_anomaly: d.bool()?,
            },
            Selector::SimilarityGate => Response::SimilarityGate {
                passed: d.bool()?,
                similarity: d.word()?,
            },
            Selector::GlobalSearch => {
                let ids = d.ids()?;
                let scores = d.words()?;
                let domains = d.domains()?;
                if ids.len() != scores.len() || ids.len() != domains.len() {
                    return Err(CodecError::LengthMismatch);
                }
                let hits = ids
                    .into_iter()
                    .zip(scores)
                    .zip(domains)
                    .map(|((global_id, score), domain)| SearchHit {
                        global_id,
                        score,
                        domain,
                    })
                    .collect();
                Response::GlobalSearch { hits }
            }
            Selector::Sweep => Response::Sweep {
                removed: d.u32()?,
                credited: d.u128_word()?,
            },
            Selector::Calibrate => Response::Calibrate {
                observations: d.u64()?,
            },
        };
        d.finish()?;
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::WORD_LEN;

    #[test]
    fn test_register_layout() {
        let req = Request::Register {
            domain: Domain::Social,
            vector: vec![1, -1],
            tags: vec![Tag([7; 32])],
            ttl_blocks: 9,
        };
        let bytes = req.encode();
        assert_eq!(bytes.len(), 1 + 4 + 2 * WORD_LEN + 4 + 32 + 8);
        assert_eq!(bytes[0], 2);
        assert_eq!(&bytes[1..5], &[0, 0, 0, 2]);
        assert_eq!(&bytes[bytes.len() - 8..], &9u64.to_be_bytes());
        assert_eq!(Request::decode(Selector::Register, &bytes).unwrap(), req);
    }

    #[test]
    fn test_classify_decodes_references() {
        let req = Request::Classify {
            query: vec![5],
            refs: vec![LabeledReference::new(3, 1), LabeledReference::new(8, 0)],
            k: 2,
        };
        assert_eq!(Request::decode(Selector::Classify, &req.encode()).unwrap(), req);
    }

    #[test]
    fn test_decode_rejects_trailing_bytes() {
        let mut bytes = Request::Lookup { global_id: 4 }.encode().to_vec();
        bytes.push(0);
        assert_eq!(
            Request::decode(Selector::Lookup, &bytes),
            Err(CodecError::TrailingBytes(1))
        );
    }

    #[test]
    fn test_decode_rejects_truncation() {
        let bytes = Request::Sweep {
            domain: Domain::Content,
            max_count: 3,
        }
        .encode();
        for cut in 0..bytes.len() {
            assert!(matches!(
                Request::decode(Selector::Sweep, &bytes[..cut]),
                Err(CodecError::Truncated { .. })
            ));
        }
    }

    #[test]
    fn test_search_response_arrays() {
        let resp = Response::GlobalSearch {
            hits: vec![
                SearchHit {
                    global_id: 2,
                    score: I256::new(5),
                    domain: Domain::Gaming,
                },
                SearchHit {
                    global_id: 9,
                    score: I256::new(-5),
                    domain: Domain::Training,
                },
            ],
        };
        let bytes = resp.encode();
        assert_eq!(bytes.len(), (4 + 16) + (4 + 2 * WORD_LEN) + (4 + 2));
        assert_eq!(Response::decode(Selector::GlobalSearch, &bytes).unwrap(), resp);

        // Three arrays whose counts disagree
        let mut e = Encoder::new();
        e.ids(&[1, 2]).words(&[I256::ONE]).domains(&[Domain::General]);
        assert_eq!(
            Response::decode(Selector::GlobalSearch, &e.finish()),
            Err(CodecError::LengthMismatch)
        );
    }
}
