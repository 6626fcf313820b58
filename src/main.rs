//! Card Stack entry point
//!
//! Handles platform-specific initialization and runs the two frame loops.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_feed {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{
        AddEventListenerOptions, Element, EventTarget, HtmlCanvasElement, MouseEvent, Response,
        WheelEvent, Window,
    };

    use card_stack::FeedTuning;
    use card_stack::content;
    use card_stack::feed::AnimationState;
    use card_stack::renderer::{BackgroundRenderer, CardElements, ScrollSpacer};

    const CARDS_URL: &str = "/cards.md";

    /// Card feed: animation state plus the elements it drives
    struct Feed {
        state: AnimationState,
        elements: CardElements,
        spacer: Option<ScrollSpacer>,
        /// Scroll container; the window scrolls when absent
        scroll_wrapper: Option<Element>,
    }

    impl Feed {
        fn read_scroll(&mut self) {
            let scroll_y = match &self.scroll_wrapper {
                Some(wrapper) => wrapper.scroll_top() as f64,
                None => web_sys::window()
                    .and_then(|w| w.scroll_y().ok())
                    .unwrap_or(0.0),
            };
            self.state.set_scroll(scroll_y as f32);
        }

        /// Re-measure cards and recompute breakpoints and spacer height
        fn relayout(&mut self) -> Result<(), JsValue> {
            let heights = self.elements.measure_heights();
            self.state.relayout(&heights);
            if let Some(spacer) = &self.spacer {
                spacer.set_height(self.state.spacer_height())?;
            }
            Ok(())
        }

        fn frame(&mut self) {
            self.read_scroll();
            if self.elements.is_empty() {
                return;
            }
            let frame = self.state.frame();
            self.elements.apply(&frame, self.state.tuning());
        }
    }

    fn viewport_size(window: &Window) -> (f32, f32) {
        let w = window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0);
        let h = window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0);
        (w as f32, h as f32)
    }

    async fn fetch_text(url: &str) -> Result<String, JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let response: Response = JsFuture::from(window.fetch_with_str(url))
            .await?
            .dyn_into()?;
        if !response.ok() {
            return Err(JsValue::from_str(&format!(
                "{} returned HTTP {}",
                url,
                response.status()
            )));
        }
        JsFuture::from(response.text()?)
            .await?
            .as_string()
            .ok_or_else(|| JsValue::from_str("response body is not text"))
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Card stack starting...");

        let tuning = FeedTuning::load();

        // The background has no dependency on the cards; start it first
        if let Err(e) = start_background(&tuning) {
            log::warn!("Background disabled: {:?}", e);
        }

        match start_feed(tuning).await {
            Ok(()) => log::info!("Card stack running!"),
            Err(e) => log::error!("Card feed failed to start: {:?}", e),
        }
    }

    fn start_background(tuning: &FeedTuning) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id("bg-canvas")
            .ok_or("no #bg-canvas")?
            .dyn_into()?;

        let (w, h) = viewport_size(&window);
        let seed = js_sys::Date::now() as u64;
        let renderer = BackgroundRenderer::new(canvas, w as u32, h as u32, &tuning.background, seed)?;
        let renderer = Rc::new(RefCell::new(renderer));
        log::info!("Background initialized with seed: {}", seed);

        {
            let renderer = renderer.clone();
            let window_clone = window.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let (w, h) = viewport_size(&window_clone);
                renderer.borrow_mut().resize(w as u32, h as u32);
            });
            window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        background_loop(renderer);
        Ok(())
    }

    async fn start_feed(tuning: FeedTuning) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        // Content is fully loaded (icons included) before anything renders
        let source = fetch_text(CARDS_URL).await?;
        let config = content::parse_configuration(&source);
        let icons = content::load_icons(&config.icon_definitions, |path| {
            let path = path.to_string();
            async move { fetch_text(&path).await }
        })
        .await;
        let cards = content::parse_markdown(&config.remaining_markdown, &icons);
        log::info!("Parsed {} cards ({} icons)", cards.len(), icons.len());

        let Some(container) = document.get_element_by_id("cards-container") else {
            log::warn!("No #cards-container, nothing to render");
            return Ok(());
        };
        container.set_inner_html(&content::render_cards_markup(&cards));
        let elements = CardElements::collect(&container)?;

        let scroll_wrapper = document.get_element_by_id("scroll-wrapper");
        let spacer_parent = scroll_wrapper
            .clone()
            .or_else(|| document.body().map(Element::from));
        let spacer = match spacer_parent {
            Some(parent) => Some(ScrollSpacer::create(&document, &parent)?),
            None => {
                log::warn!("No scroll container for the spacer");
                None
            }
        };

        let (w, h) = viewport_size(&window);
        let feed = Rc::new(RefCell::new(Feed {
            state: AnimationState::new(tuning, w, h),
            elements,
            spacer,
            scroll_wrapper: scroll_wrapper.clone(),
        }));
        feed.borrow_mut().relayout()?;

        if let Some(wrapper) = scroll_wrapper {
            setup_wheel_forwarding(&window, wrapper)?;
        }
        setup_pointer_handlers(&feed)?;
        setup_resize(&window, feed.clone())?;

        feed_loop(feed);
        Ok(())
    }

    /// Forward wheel events over the fixed cards to the scroll container
    fn setup_wheel_forwarding(window: &Window, wrapper: Element) -> Result<(), JsValue> {
        let closure = Closure::<dyn FnMut(_)>::new(move |event: WheelEvent| {
            let wrapper_target: &EventTarget = wrapper.as_ref();
            let on_wrapper = event.target().is_some_and(|t| &t == wrapper_target);
            if !on_wrapper {
                wrapper.scroll_by_with_x_and_y(0.0, event.delta_y());
            }
        });
        let options = AddEventListenerOptions::new();
        options.set_passive(true);
        window.add_event_listener_with_callback_and_add_event_listener_options(
            "wheel",
            closure.as_ref().unchecked_ref(),
            &options,
        )?;
        closure.forget();
        Ok(())
    }

    fn setup_pointer_handlers(feed: &Rc<RefCell<Feed>>) -> Result<(), JsValue> {
        let count = feed.borrow().elements.len();
        for index in 0..count {
            let Some(card) = feed.borrow().elements.wrapper(index).cloned() else {
                continue;
            };

            // Mouse move - tilt toward the pointer
            {
                let feed = feed.clone();
                let card_clone = card.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                    let rect = card_clone.get_bounding_client_rect();
                    let x = (event.client_x() as f64 - rect.left()) as f32;
                    let y = (event.client_y() as f64 - rect.top()) as f32;
                    feed.borrow_mut().state.pointer_move(
                        index,
                        x,
                        y,
                        rect.width() as f32,
                        rect.height() as f32,
                    );
                });
                card.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())?;
                closure.forget();
            }

            // Mouse leave - settle back
            {
                let feed = feed.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                    feed.borrow_mut().state.pointer_leave(index);
                });
                card.add_event_listener_with_callback("mouseleave", closure.as_ref().unchecked_ref())?;
                closure.forget();
            }
        }
        Ok(())
    }

    fn setup_resize(window: &Window, feed: Rc<RefCell<Feed>>) -> Result<(), JsValue> {
        let window_clone = window.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let (w, h) = viewport_size(&window_clone);
            let mut f = feed.borrow_mut();
            f.state.set_viewport(w, h);
            match f.relayout() {
                Ok(()) => log::info!("Resized to {}x{}", w, h),
                Err(e) => log::warn!("Relayout after resize failed: {:?}", e),
            }
        });
        window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn request_animation_frame(f: impl FnOnce() + 'static) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |_time: f64| f());
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn feed_loop(feed: Rc<RefCell<Feed>>) {
        feed.borrow_mut().frame();
        request_animation_frame(move || feed_loop(feed));
    }

    fn background_loop(renderer: Rc<RefCell<BackgroundRenderer>>) {
        if let Err(e) = renderer.borrow_mut().frame() {
            log::warn!("Background frame failed: {:?}", e);
        }
        request_animation_frame(move || background_loop(renderer));
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_feed::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Card stack (native) starting...");
    log::info!("Native mode has no DOM - run with `trunk serve` for the web version");

    println!("\nHeadless scroll sweep...");
    preview_scroll_sweep();

    println!("\nHeadless blob simulation...");
    preview_blobs();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn preview_scroll_sweep() {
    use card_stack::FeedTuning;
    use card_stack::feed::AnimationState;

    let mut state = AnimationState::new(FeedTuning::load(), 1280.0, 800.0);
    state.relayout(&[300.0, 400.0, 350.0, 520.0, 280.0]);
    let peek = state.tuning().peek;

    let steps = 8;
    for step in 0..=steps {
        let scroll = state.max_scroll() * step as f32 / steps as f32;
        state.set_scroll(scroll);
        let frame = state.frame();

        for pair in frame.cards.windows(2) {
            assert!(pair[1].visual_top() >= pair[0].visual_top() - peek - 1e-2);
        }
        let clips: Vec<String> = frame
            .cards
            .iter()
            .map(|c| format!("{:.0}", c.clip_inset))
            .collect();
        println!(
            "  scroll {:7.1}  progress {:4.2}  active {}  clips [{}]",
            scroll,
            frame.scroll.progress,
            frame.scroll.active_index,
            clips.join(", ")
        );
    }
    println!("✓ Peek gap held across the scroll range");
}

#[cfg(not(target_arch = "wasm32"))]
fn preview_blobs() {
    use card_stack::BackgroundTuning;
    use card_stack::background::BlobField;
    use glam::Vec2;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    let tuning = BackgroundTuning::default();
    let max_speed = tuning.max_speed;
    let mut rng = Pcg32::seed_from_u64(0x5eed);
    let mut field = BlobField::with_default_blobs(Vec2::new(1280.0, 800.0), tuning, &mut rng);

    for _ in 0..10_000 {
        field.step();
        assert!(field.blobs.iter().all(|b| b.vel.length() <= max_speed + 1e-4));
    }
    for blob in &field.blobs {
        println!("  blob at ({:.0}, {:.0}) speed {:.2}", blob.pos.x, blob.pos.y, blob.vel.length());
    }
    println!("✓ Blob speeds stayed under the cap");
}
