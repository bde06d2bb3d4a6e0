use criterion::{criterion_group, criterion_main, Criterion};
use http::Method;
use routemap::declaration::{build_app_table, RouteModule};
use routemap::route_cache::Fingerprint;
use routemap::{ReverseIndex, RouteDeclaration};
use std::hint::black_box;

fn zoo() -> RouteModule {
    RouteModule::new("zoo")
        .get(["/"], "RootHandler")
        .get(["zoo/animals"], "GetAnimals")
        .post(["zoo/animals"], "CreateAnimal")
        .get(["zoo/animals/:id<[0-9]+>", "zoo/animals/:id<[0-9]+>.:format"], "GetAnimal")
        .put(["zoo/animals/:id"], "UpdateAnimal")
        .patch(["zoo/animals/:id"], "PatchAnimal")
        .delete(["zoo/animals/:id"], "DeleteAnimal")
        .get(["zoo/animals/:id/toys/:toy_id"], "AnimalToy")
        .get(
            ["zoo/:category/animals/:id/habitats/:habitat_id/sections/:section_id"],
            "HabitatSection",
        )
        .post(
            ["inventory/:warehouse_id/feeds/:feed_id/items/:item_id/batches/:batch_id"],
            "PostItemBatch",
        )
        .get(["complex/:a/:b/:c/:d/:e/:f/:g/:h/:i"], "ComplexManyParams")
        .head(["zoo/health"], "HealthCheck")
        .options(["zoo/health"], "SupportedOps")
        .get(["assets/:*"], "Assets")
        .get(["zoo/animals/search"], "SearchAnimals")
        .first()
        .get([":*"], "NotFound")
        .last()
}

/// A large flat module, so matching has to walk past many candidates.
fn catalogue(size: usize) -> RouteModule {
    (0..size).fold(RouteModule::new("catalogue"), |module, i| {
        module.declare(RouteDeclaration::new(
            Method::GET,
            [format!("catalogue/section{i}/:item")],
            format!("Section{i}"),
        ))
    })
}

fn bench_route_throughput(c: &mut Criterion) {
    let table = build_app_table(&[zoo()]).unwrap();
    c.bench_function("route_match", |b| {
        let test_paths = [
            (Method::GET, "/zoo/animals/123"),
            (Method::GET, "/zoo/animals/123.json"),
            (Method::GET, "/zoo/animals/123/toys/456"),
            (Method::GET, "/zoo/cats/animals/123/habitats/88/sections/5"),
            (Method::POST, "/inventory/1/feeds/2/items/3/batches/4"),
            (Method::GET, "/complex/1/2/3/4/5/6/7/8/9"),
            (Method::HEAD, "/zoo/animals"),
            (Method::GET, "/assets/css/site.css"),
        ];
        b.iter(|| {
            for (method, path) in &test_paths {
                black_box(table.route(method, path));
            }
        });
    });

    c.bench_function("route_no_match", |b| {
        b.iter(|| black_box(table.route(&Method::DELETE, black_box("/nowhere/at/all"))));
    });
}

fn bench_large_table(c: &mut Criterion) {
    let table = build_app_table(&[catalogue(500)]).unwrap();
    c.bench_function("route_match_500_last", |b| {
        b.iter(|| black_box(table.route(&Method::GET, black_box("/catalogue/section499/widget"))));
    });
}

fn bench_boot(c: &mut Criterion) {
    let modules = [zoo(), catalogue(200)];
    c.bench_function("compile_table", |b| {
        b.iter(|| black_box(build_app_table(black_box(&modules)).unwrap()));
    });
    c.bench_function("fingerprint", |b| {
        b.iter(|| black_box(Fingerprint::of(black_box(&modules))));
    });

    let table = build_app_table(&modules).unwrap();
    let reverse = ReverseIndex::build(&table);
    c.bench_function("url_for", |b| {
        b.iter(|| {
            black_box(reverse.url_for(
                "HabitatSection",
                [("category", "cats"), ("id", "1"), ("habitat_id", "2"), ("section_id", "3")],
            ))
        });
    });
}

criterion_group!(benches, bench_route_throughput, bench_large_table, bench_boot);
criterion_main!(benches);
