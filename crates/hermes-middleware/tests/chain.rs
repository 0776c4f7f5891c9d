//! Chain composition order and short-circuiting.

use bytes::Bytes;
use hermes_middleware::{
    BoxFuture, Chain, Dispatch, Middleware, MiddlewareContext, Next, Request, Response,
    ResponseExt,
};
use http::StatusCode;
use http_body_util::Full;
use parking_lot::Mutex;
use std::sync::Arc;

type Journal = Arc<Mutex<Vec<String>>>;

struct Recorder {
    name: &'static str,
    journal: Journal,
}

impl Middleware for Recorder {
    fn name(&self) -> &'static str {
        self.name
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut MiddlewareContext,
        request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, Response> {
        Box::pin(async move {
            self.journal.lock().push(format!("{}-before", self.name));
            let response = next.run(ctx, request).await;
            self.journal.lock().push(format!("{}-after", self.name));
            response
        })
    }
}

struct Gate {
    journal: Journal,
}

impl Middleware for Gate {
    fn name(&self) -> &'static str {
        "gate"
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut MiddlewareContext,
        request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, Response> {
        Box::pin(async move {
            if request.headers().contains_key("authorization") {
                return next.run(ctx, request).await;
            }
            self.journal.lock().push("gate-denied".into());
            Response::text(StatusCode::UNAUTHORIZED, "missing credentials")
        })
    }
}

/// Records the tag an inner link left in the context once the response is back.
struct Report {
    journal: Journal,
}

impl Middleware for Report {
    fn name(&self) -> &'static str {
        "report"
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut MiddlewareContext,
        request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, Response> {
        Box::pin(async move {
            let response = next.run(ctx, request).await;
            let tag = ctx.get_extension::<&'static str>().copied().unwrap_or("untagged");
            self.journal.lock().push(format!("report-{tag}"));
            response
        })
    }
}

struct Tag(&'static str);

impl Middleware for Tag {
    fn name(&self) -> &'static str {
        "tag"
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut MiddlewareContext,
        request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, Response> {
        ctx.set_extension(self.0);
        next.run(ctx, request)
    }
}

/// A terminal that borrows its state instead of owning it.
struct Service {
    journal: Journal,
}

impl Dispatch for Service {
    fn dispatch<'c>(
        &'c self,
        _ctx: &'c mut MiddlewareContext,
        _request: Request,
    ) -> BoxFuture<'c, Response> {
        Box::pin(async move {
            self.journal.lock().push("service".into());
            Response::text(StatusCode::OK, "done")
        })
    }
}

fn request() -> Request {
    http::Request::new(Full::new(Bytes::new()))
}

async fn dispatch_through(chain: &Chain, journal: &Journal, request: Request) -> Response {
    let mut ctx = MiddlewareContext::new();
    let journal = Arc::clone(journal);
    chain
        .process(
            &mut ctx,
            request,
            Next::handler(move |_ctx, _req| {
                Box::pin(async move {
                    journal.lock().push("handler".into());
                    Response::text(StatusCode::OK, "done")
                })
            }),
        )
        .await
}

#[tokio::test]
async fn first_supplied_is_outermost() {
    let journal = Journal::default();
    let chain = Chain::builder()
        .with(Recorder {
            name: "A",
            journal: Arc::clone(&journal),
        })
        .with(Recorder {
            name: "B",
            journal: Arc::clone(&journal),
        })
        .build();

    let response = dispatch_through(&chain, &journal, request()).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        *journal.lock(),
        ["A-before", "B-before", "handler", "B-after", "A-after"]
    );
}

#[tokio::test]
async fn short_circuit_skips_inner_links() {
    let journal = Journal::default();
    let chain = Chain::builder()
        .with(Recorder {
            name: "A",
            journal: Arc::clone(&journal),
        })
        .with(Gate {
            journal: Arc::clone(&journal),
        })
        .with(Recorder {
            name: "C",
            journal: Arc::clone(&journal),
        })
        .build();

    let response = dispatch_through(&chain, &journal, request()).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(*journal.lock(), ["A-before", "gate-denied", "A-after"]);
}

#[tokio::test]
async fn chain_is_reusable_across_requests() {
    let journal = Journal::default();
    let chain = Chain::builder()
        .with(Gate {
            journal: Arc::clone(&journal),
        })
        .build();

    let allowed = http::Request::builder()
        .header("authorization", "Bearer t")
        .body(Full::new(Bytes::new()))
        .unwrap();

    let (denied, ok) = tokio::join!(
        dispatch_through(&chain, &journal, request()),
        dispatch_through(&chain, &journal, allowed),
    );

    assert_eq!(denied.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(ok.status(), StatusCode::OK);
    assert_eq!(journal.lock().len(), 2);
}

#[tokio::test]
async fn outer_stage_reads_context_after_inner_links_return() {
    let journal = Journal::default();
    let chain = Chain::builder()
        .with(Report {
            journal: Arc::clone(&journal),
        })
        .with(Tag("inner"))
        .build();
    let service = Service {
        journal: Arc::clone(&journal),
    };

    let mut ctx = MiddlewareContext::new();
    let response = chain
        .process(&mut ctx, request(), Next::dispatch(&service))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(*journal.lock(), ["service", "report-inner"]);
    assert_eq!(ctx.get_extension::<&'static str>(), Some(&"inner"));
}
