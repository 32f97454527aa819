//! Page scripts evaluated by [`super::DomSurface`].
//!
//! Each script reads its parameters from a base64-encoded JSON payload
//! substituted for `{{B64_TOKEN}}` so no selector or CSS text ever needs
//! escaping, and returns its result as a JSON string.

use crate::Result;
use base64::Engine as Base64Engine;
use serde::Serialize;

const TOKEN: &str = "{{B64_TOKEN}}";

/// Substitute the encoded payload into a script template
pub(crate) fn with_payload<T: Serialize>(template: &str, payload: &T) -> Result<String> {
    let json = serde_json::to_vec(payload)?;
    let b64 = base64::engine::general_purpose::STANDARD.encode(json);
    Ok(template.replace(TOKEN, &b64))
}

pub(crate) const COUNT_SLIDES: &str = r#"(function(){
    const p = JSON.parse(new TextDecoder().decode(Uint8Array.from(atob("{{B64_TOKEN}}"), c => c.charCodeAt(0))));
    return JSON.stringify(document.querySelectorAll(p.slide).length);
})()"#;

pub(crate) const INJECT_STYLE: &str = r#"(function(){
    const p = JSON.parse(new TextDecoder().decode(Uint8Array.from(atob("{{B64_TOKEN}}"), c => c.charCodeAt(0))));
    const style = document.createElement('style');
    style.setAttribute('data-deckpress', 'export');
    style.textContent = p.css;
    (document.head || document.documentElement).appendChild(style);
    return JSON.stringify(true);
})()"#;

pub(crate) const HIDE_ELEMENTS: &str = r#"(function(){
    const p = JSON.parse(new TextDecoder().decode(Uint8Array.from(atob("{{B64_TOKEN}}"), c => c.charCodeAt(0))));
    let hidden = 0;
    p.selectors.forEach(function(sel){
        document.querySelectorAll(sel).forEach(function(el){
            el.style.display = 'none';
            hidden++;
        });
    });
    return JSON.stringify(hidden);
})()"#;

pub(crate) const ISOLATE: &str = r#"(function(){
    const p = JSON.parse(new TextDecoder().decode(Uint8Array.from(atob("{{B64_TOKEN}}"), c => c.charCodeAt(0))));
    const slides = document.querySelectorAll(p.slide);
    if (p.index < 0 || p.index >= slides.length) {
        return JSON.stringify({ applied: false, active: document.querySelectorAll(p.slide + '.active').length });
    }
    const wrapper = document.querySelector(p.wrapper);
    if (wrapper) {
        wrapper.style.transform = 'translateX(-' + (p.index * 100) + 'vw)';
    }
    slides.forEach(function(slide, i){
        if (i !== p.index) {
            slide.classList.remove('active');
            return;
        }
        slide.classList.add('active');
        slide.style.opacity = '1';
        slide.style.transform = 'translateX(0)';
        const content = slide.querySelector(p.content);
        if (!content) return;
        p.corrections.forEach(function(c){
            let nodes = Array.from(content.querySelectorAll(c.selector));
            if (c.pick === 'first') {
                nodes = nodes.slice(0, 1);
            } else if (c.pick.first_containing !== undefined) {
                nodes = nodes.slice(0, 1).filter(function(n){ return n.textContent.includes(c.pick.first_containing); });
            }
            nodes.forEach(function(n){
                c.properties.forEach(function(kv){ n.style.setProperty(kv[0], kv[1], 'important'); });
            });
        });
    });
    return JSON.stringify({ applied: true, active: document.querySelectorAll(p.slide + '.active').length });
})()"#;

pub(crate) const MEASURE_ACTIVE: &str = r#"(function(){
    const p = JSON.parse(new TextDecoder().decode(Uint8Array.from(atob("{{B64_TOKEN}}"), c => c.charCodeAt(0))));
    const slide = document.querySelector(p.slide + '.active');
    if (!slide) return JSON.stringify(null);
    const content = slide.querySelector(p.content);
    if (!content) return JSON.stringify(null);
    return JSON.stringify(content.getBoundingClientRect().height);
})()"#;

pub(crate) const APPLY_SCALE: &str = r#"(function(){
    const p = JSON.parse(new TextDecoder().decode(Uint8Array.from(atob("{{B64_TOKEN}}"), c => c.charCodeAt(0))));
    const slide = document.querySelector(p.slide + '.active');
    if (!slide) return JSON.stringify(false);
    const content = slide.querySelector(p.content);
    if (!content) return JSON.stringify(false);
    content.style.transform = 'scale(' + p.scale + ')';
    content.style.transformOrigin = 'top center';
    slide.style.display = 'flex';
    slide.style.alignItems = 'center';
    slide.style.justifyContent = 'center';
    return JSON.stringify(true);
})()"#;

pub(crate) const SCAN_GEOMETRY: &str = r#"(function(){
    const p = JSON.parse(new TextDecoder().decode(Uint8Array.from(atob("{{B64_TOKEN}}"), c => c.charCodeAt(0))));
    function box(r){ return { left: r.left, top: r.top, width: r.width, height: r.height }; }
    const container = document.querySelector(p.container);
    const canvas = container
        ? box(container.getBoundingClientRect())
        : { left: 0, top: 0, width: window.innerWidth, height: window.innerHeight };
    const slides = Array.from(document.querySelectorAll(p.slide)).map(function(slide){
        const heading = slide.querySelector('h2') || slide.querySelector('h1');
        return { rect: box(slide.getBoundingClientRect()), title: heading ? heading.textContent : '' };
    });
    return JSON.stringify({ container: canvas, slides: slides });
})()"#;

pub(crate) const RESET_TRANSIENT: &str = r#"(function(){
    const p = JSON.parse(new TextDecoder().decode(Uint8Array.from(atob("{{B64_TOKEN}}"), c => c.charCodeAt(0))));
    const slide = document.querySelector(p.slide + '.active');
    if (!slide) return JSON.stringify(false);
    const content = slide.querySelector(p.content);
    if (content) {
        content.style.transform = '';
        content.style.transformOrigin = '';
    }
    slide.style.display = '';
    slide.style.alignItems = '';
    slide.style.justifyContent = '';
    return JSON.stringify(true);
})()"#;

// Two frames, then poll for finite running animations/transitions until the
// bound elapses. Infinite animations never finish and are ignored.
pub(crate) const SETTLE: &str = r#"(async function(){
    const p = JSON.parse(new TextDecoder().decode(Uint8Array.from(atob("{{B64_TOKEN}}"), c => c.charCodeAt(0))));
    const start = performance.now();
    const deadline = start + p.max_ms;
    const frame = function(){
        return new Promise(function(resolve){
            requestAnimationFrame(function(){ resolve(); });
            setTimeout(resolve, 50);
        });
    };
    await frame();
    await frame();
    while (performance.now() < deadline) {
        const running = document.getAnimations
            ? document.getAnimations().filter(function(a){
                if (a.playState !== 'running') return false;
                const timing = a.effect ? a.effect.getComputedTiming() : null;
                return !timing || timing.iterations !== Infinity;
              }).length
            : 0;
        if (running === 0) {
            return JSON.stringify({ settled: true, waited_ms: performance.now() - start });
        }
        await new Promise(function(resolve){ setTimeout(resolve, 16); });
    }
    return JSON.stringify({ settled: false, waited_ms: performance.now() - start });
})()"#;
