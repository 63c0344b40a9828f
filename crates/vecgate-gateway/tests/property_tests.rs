//! Property tests over the encoded gateway interface.

use proptest::prelude::*;
use vecgate_gateway::{CallContext, Gateway, GatewayConfig, GatewayError, Request, Response};
use vecgate_registry::Domain;
use vecgate_testkit::{arb_domain, arb_identity, arb_tags, arb_vector, arb_vector_pair};

fn call(gw: &mut Gateway, ctx: &CallContext, req: &Request) -> Result<Response, GatewayError> {
    let selector = req.selector();
    let outcome = gw.dispatch(ctx, selector.as_u32(), &req.encode())?;
    Ok(Response::decode(selector, &outcome.output).unwrap())
}

fn arb_registration() -> impl Strategy<Value = (Domain, Vec<i128>, Vec<vecgate_registry::Tag>, u64)> {
    (arb_domain(), (1usize..16).prop_flat_map(arb_vector), arb_tags(4), 0u64..20)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_register_lookup_round_trip(
        owner in arb_identity(),
        (domain, vector, tags, ttl) in arb_registration(),
        block in 0u64..1_000,
    ) {
        let mut gw = Gateway::new(GatewayConfig::default()).unwrap();
        let ctx = CallContext::new(owner, block, u64::MAX);
        let id = match call(&mut gw, &ctx, &Request::Register {
            domain,
            vector: vector.clone(),
            tags,
            ttl_blocks: ttl,
        }).unwrap() {
            Response::Register { global_id, .. } => global_id,
            other => panic!("unexpected response {:?}", other),
        };

        let resp = call(&mut gw, &ctx, &Request::Lookup { global_id: id }).unwrap();
        prop_assert_eq!(resp, Response::Lookup { exists: true, vector });
    }

    #[test]
    fn prop_quota_conservation(
        owner in arb_identity(),
        regs in prop::collection::vec(arb_registration(), 1..12),
    ) {
        let mut gw = Gateway::new(GatewayConfig::default()).unwrap();
        let ctx = CallContext::new(owner, 0, u64::MAX);

        let mut total = 0u128;
        for (domain, vector, tags, ttl) in &regs {
            let before = gw.registry().quota().remaining(&owner);
            let resp = call(&mut gw, &ctx, &Request::Register {
                domain: *domain,
                vector: vector.clone(),
                tags: tags.clone(),
                ttl_blocks: *ttl,
            }).unwrap();
            let Response::Register { remaining_quota, .. } = resp else {
                panic!("unexpected response");
            };
            total += before - remaining_quota;
        }
        prop_assert_eq!(gw.registry().quota().used(&owner), total);

        // Past every TTL, sweeping each domain returns exactly what expired
        let late = CallContext::new(owner, 1_000, u64::MAX);
        let mut credited = 0u128;
        for domain in Domain::ALL {
            let Response::Sweep { credited: c, .. } = call(&mut gw, &late, &Request::Sweep {
                domain,
                max_count: 64,
            }).unwrap() else {
                panic!("unexpected response");
            };
            credited += c;
        }
        prop_assert_eq!(gw.registry().quota().used(&owner), total - credited);

        let immortal = regs.iter().filter(|r| r.3 == 0).count();
        prop_assert_eq!(gw.registry().arena().len(), immortal);
    }

    #[test]
    fn prop_similarity_symmetric(pair in arb_vector_pair(24), t in -1_000i128..=1_000) {
        let mut gw = Gateway::new(GatewayConfig::default()).unwrap();
        let ctx = CallContext::new(vecgate_testkit::identity(1), 0, u64::MAX);
        let threshold = vecgate_fixed::I256::new(t * 1_000_000_000_000_000);
        let (a, b) = pair;

        let ab = call(&mut gw, &ctx, &Request::SimilarityGate { a: a.clone(), b: b.clone(), threshold }).unwrap();
        let ba = call(&mut gw, &ctx, &Request::SimilarityGate { a: b, b: a, threshold }).unwrap();
        prop_assert_eq!(ab, ba);
    }

    #[test]
    fn prop_reads_are_deterministic_and_pure(
        vectors in prop::collection::vec(arb_vector(3), 1..10),
        query in arb_vector(3),
        k in 1u32..6,
    ) {
        let mut gw = Gateway::new(GatewayConfig::default()).unwrap();
        let ctx = CallContext::new(vecgate_testkit::identity(1), 0, u64::MAX);
        for (i, v) in vectors.iter().enumerate() {
            call(&mut gw, &ctx, &Request::Register {
                domain: Domain::ALL[i % Domain::COUNT],
                vector: v.clone(),
                tags: vec![],
                ttl_blocks: 0,
            }).unwrap();
        }
        let snapshot = gw.registry().clone();

        let reads = [
            Request::GlobalSearch { query: query.clone(), k },
            Request::ClusterAssign {
                query: query.clone(),
                centroids: (1..=vectors.len() as u64).collect(),
            },
            Request::Classify {
                query: query.clone(),
                refs: (1..=vectors.len() as u64)
                    .map(|id| vecgate_engine::LabeledReference::new(id, (id % 3) as u32))
                    .collect(),
                k,
            },
        ];
        for req in &reads {
            let first = call(&mut gw, &ctx, req);
            let second = call(&mut gw, &ctx, req);
            prop_assert_eq!(first, second);
        }
        prop_assert_eq!(gw.registry(), &snapshot);
    }
}
