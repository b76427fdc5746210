#![allow(dead_code)]

pub mod dispatch_test;

#[macro_export]
macro_rules! dispatch_test {
    ($name:ident, |$harness:ident| $body:expr) => {
        paste::paste! {
            #[test]
            fn [<$name _inline>]() {
                let runtime = tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
                    .expect("failed to build tokio runtime");
                runtime.block_on(async {
                    let $harness = $crate::support::dispatch_test::Harness::new(
                        $crate::support::dispatch_test::DispatchMode::Inline,
                    );
                    $body.await;
                });
            }

            #[test]
            fn [<$name _scheduled>]() {
                let runtime = tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
                    .expect("failed to build tokio runtime");
                runtime.block_on(async {
                    let $harness = $crate::support::dispatch_test::Harness::new(
                        $crate::support::dispatch_test::DispatchMode::Scheduled,
                    );
                    $body.await;
                });
            }
        }
    };
}
